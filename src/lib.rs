//! AutoHunter: a directory-listing file hunter
//!
//! This crate discovers downloadable files exposed through HTTP directory
//! listings (Apache/Nginx autoindex pages and similar), filters them by file
//! category, and bundles a selected subset into a single ZIP archive.

pub mod archive;
pub mod category;
pub mod config;
pub mod crawler;
pub mod server;
pub mod url;

use thiserror::Error;

/// Main error type for AutoHunter operations
#[derive(Debug, Error)]
pub enum HunterError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Unknown file type: {0}")]
    UnknownCategory(String),

    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("No files could be downloaded ({} failed)", errors.len())]
    NothingDownloaded { errors: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid environment override {name}: {value}")]
    InvalidEnv { name: String, value: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL is required")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("URL has no scheme or host: {0}")]
    MissingAuthority(String),
}

/// Result type alias for AutoHunter operations
pub type Result<T> = std::result::Result<T, HunterError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use archive::{ArchivePackager, ArchiveResult, FileRef};
pub use category::{should_include, FileCategory};
pub use config::Config;
pub use crawler::{DirectoryCrawler, FileDescriptor, ScanRequest, ScanResult};
