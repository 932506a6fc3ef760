use crate::server::models::ErrorResponse;
use crate::HunterError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::any::Any;

/// Error returned by route handlers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    errors: Vec<String>,
}

impl ApiError {
    /// A client input error (400)
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message.into(),
            errors: Vec::new(),
        }
    }

    /// An unexpected failure (500)
    pub fn internal(message: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: format!("Internal error: {}", message),
            errors: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<HunterError> for ApiError {
    fn from(error: HunterError) -> Self {
        match error {
            HunterError::UrlError(_)
            | HunterError::UrlParse(_)
            | HunterError::UnknownCategory(_)
            | HunterError::InvalidPayload(_) => Self::bad_request(error.to_string()),
            HunterError::NothingDownloaded { errors } => Self {
                status: StatusCode::BAD_GATEWAY,
                error: "No files could be downloaded".to_string(),
                errors,
            },
            other => Self::internal(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// Turns a handler panic into the JSON 500 body
pub(crate) fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError::internal(detail).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{} ({} entry errors)", self.error, self.errors.len());
        } else {
            tracing::debug!("Rejected request: {}", self.error);
        }

        let body = ErrorResponse {
            success: false,
            error: self.error,
            errors: self.errors,
        };
        (self.status, Json(body)).into_response()
    }
}
