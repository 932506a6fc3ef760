use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for AutoHunter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// HTTP service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to listen on (overridden by the `PORT` environment variable)
    pub port: u16,

    /// Allowed CORS origins; `"*"` allows any origin
    #[serde(rename = "cors-origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// Directory crawler configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Depth used when a scan does not ask for one
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Largest depth a scan may ask for
    #[serde(rename = "max-depth-limit")]
    pub max_depth_limit: u32,

    /// Timeout for listing and file GET requests (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Timeout for HEAD size probes (seconds)
    #[serde(rename = "probe-timeout-secs")]
    pub probe_timeout_secs: u64,

    /// Issue HEAD requests to learn file sizes
    #[serde(rename = "probe-sizes")]
    pub probe_sizes: bool,

    /// User-Agent sent while crawling
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_depth_limit: 10,
            request_timeout_secs: 30,
            probe_timeout_secs: 10,
            probe_sizes: true,
            user_agent: format!("AutoHunter/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Archive packager configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Timeout for each file download (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Browser-like User-Agent sent with downloads
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Stem of the attachment filename offered to clients
    #[serde(rename = "archive-name")]
    pub archive_name: String,
}

impl ArchiveConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            archive_name: "autohunter_files".to_string(),
        }
    }
}
