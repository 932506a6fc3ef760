//! HTTP service for AutoHunter
//!
//! Exposes the crawler and the packager over HTTP:
//! - `GET /` liveness message
//! - `POST /scan` directory scan returning descriptors as JSON
//! - `POST /download` ZIP archive of the selected files
//!
//! The router is public so integration tests can drive it without binding
//! a socket.

mod error;
mod handlers;
mod models;

pub use error::ApiError;
pub use handlers::{HEADER_FILES_DOWNLOADED, HEADER_FILES_FAILED, HEADER_FILES_SKIPPED};
pub use models::{ErrorResponse, ScanPayload, ScanResponse, StatusResponse};

use crate::archive::ArchivePackager;
use crate::config::Config;
use crate::crawler::DirectoryCrawler;
use crate::HunterError;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use error::panic_response;
use handlers::{download_handler, home_handler, scan_handler};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Shared state injected into every route handler
#[derive(Clone)]
pub struct AppState {
    pub crawler: Arc<DirectoryCrawler>,
    pub packager: Arc<ArchivePackager>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Builds the crawler and packager described by `config`
    pub fn from_config(config: Config) -> Result<Self, HunterError> {
        let crawler = DirectoryCrawler::new(config.crawler.clone())?;
        let packager = ArchivePackager::new(config.archive.clone())?;
        Ok(Self {
            crawler: Arc::new(crawler),
            packager: Arc::new(packager),
            config: Arc::new(config),
        })
    }
}

/// Build the Axum application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/", get(home_handler))
        .route("/scan", post(scan_handler))
        .route("/download", post(download_handler))
        .with_state(state)
        .layer(cors)
        .layer(CatchPanicLayer::custom(panic_response))
}

/// Binds the configured address and serves until Ctrl-C
pub async fn serve(config: Config) -> Result<(), HunterError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = create_router(AppState::from_config(config)?);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("AutoHunter API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .expose_headers([
            CONTENT_DISPOSITION,
            CONTENT_TYPE,
            HeaderName::from_static(HEADER_FILES_DOWNLOADED),
            HeaderName::from_static(HEADER_FILES_FAILED),
            HeaderName::from_static(HEADER_FILES_SKIPPED),
        ]);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin.trim_end_matches('/')).ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
