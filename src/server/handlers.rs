use crate::category::FileCategory;
use crate::crawler::ScanRequest;
use crate::server::error::ApiError;
use crate::server::models::{ScanPayload, ScanResponse, StatusResponse};
use crate::server::AppState;
use crate::url::{is_valid_url, redact_credentials, UrlAdvisory};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::Value;

pub const HEADER_FILES_DOWNLOADED: &str = "x-files-downloaded";
pub const HEADER_FILES_FAILED: &str = "x-files-failed";
pub const HEADER_FILES_SKIPPED: &str = "x-files-skipped";

pub async fn home_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "AutoHunter API is running".to_string(),
    })
}

pub async fn scan_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScanPayload>, JsonRejection>,
) -> Result<Json<ScanResponse>, ApiError> {
    let Json(payload) = payload?;
    let url = payload.url.as_deref().map(str::trim).unwrap_or("");
    if url.is_empty() {
        return Err(ApiError::bad_request("URL is required"));
    }
    if !is_valid_url(url) {
        return Err(ApiError::bad_request(format!("Invalid URL: {}", url)));
    }

    let category = match payload.file_type.as_deref() {
        Some(name) => name.parse::<FileCategory>()?,
        None => FileCategory::default(),
    };

    let settings = state.crawler.settings();
    let max_depth = payload.max_depth.unwrap_or(settings.max_depth);
    if max_depth > settings.max_depth_limit {
        return Err(ApiError::bad_request(format!(
            "max_depth must be at most {}",
            settings.max_depth_limit
        )));
    }

    tracing::info!(
        "Scan requested: {} (type: {})",
        redact_credentials(url),
        category
    );
    UrlAdvisory::inspect(url).log(url);

    let request = ScanRequest::new(url, category)
        .with_embedded_src(payload.include_src.unwrap_or(false))
        .with_max_depth(max_depth);

    let result = state.crawler.scan(&request).await;

    Ok(Json(ScanResponse {
        success: true,
        files_found: result.count,
        message: format!("Found {} files of type {}", result.count, category),
        files: result.files,
    }))
}

pub async fn download_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let result = state.packager.package_payload(&payload).await?;

    let filename = format!(
        "{}_{}.zip",
        state.packager.settings().archive_name,
        Utc::now().format("%Y%m%d_%H%M%S")
    );

    let headers = [
        (CONTENT_TYPE, "application/zip".to_string()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
        (
            HeaderName::from_static(HEADER_FILES_DOWNLOADED),
            result.downloaded_count.to_string(),
        ),
        (
            HeaderName::from_static(HEADER_FILES_FAILED),
            result.failed_count.to_string(),
        ),
        (
            HeaderName::from_static(HEADER_FILES_SKIPPED),
            result.skipped_count.to_string(),
        ),
    ];

    Ok((StatusCode::OK, headers, result.archive_bytes).into_response())
}
