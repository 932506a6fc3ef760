use crate::crawler::FileDescriptor;
use serde::{Deserialize, Serialize};

/// Body of `POST /scan`
///
/// Every field is optional at the JSON level so that a missing URL is
/// reported as a client error by the handler rather than as a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanPayload {
    #[serde(default)]
    pub url: Option<String>,

    /// One of `zip`, `images`, `pdf` (default `zip`)
    #[serde(default)]
    pub file_type: Option<String>,

    /// Also collect `src` links of embedded resources
    #[serde(default)]
    pub include_src: Option<bool>,

    /// Overrides the configured depth, up to the configured limit
    #[serde(default)]
    pub max_depth: Option<u32>,
}

/// Successful `POST /scan` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    pub success: bool,
    pub files_found: usize,
    pub files: Vec<FileDescriptor>,
    pub message: String,
}

/// `GET /` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
}

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,

    /// Per-entry details for failed archive batches
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}
