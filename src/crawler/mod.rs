//! Crawler module for directory listing discovery
//!
//! This module contains the core scanning logic, including:
//! - HTTP fetching with per-request timeouts and embedded basic auth
//! - Tolerant link extraction from listing markup
//! - Depth-bounded recursive traversal with per-node failure isolation

mod directory;
mod extract;
mod fetcher;
mod types;

pub use directory::DirectoryCrawler;
pub use extract::{
    extract_anchor_links, extract_bare_urls, extract_embedded_links, extract_links, ExtractionMode,
};
pub use fetcher::{build_http_client, fetch_bytes, fetch_url, probe_size, FetchResult};
pub use types::{FileDescriptor, ScanRequest, ScanResult, DEFAULT_MAX_DEPTH};

use crate::config::CrawlerConfig;
use crate::HunterError;

/// Runs a complete scan with a freshly built crawler
///
/// This is the one-shot entry point. It will:
/// 1. Validate the request
/// 2. Build the HTTP client
/// 3. Walk the listing tree from the root URL
///
/// # Arguments
///
/// * `request` - What to scan and how deep
/// * `settings` - Timeouts, probing and user agent
///
/// # Returns
///
/// * `Ok(ScanResult)` - Scan completed (possibly with isolated failures)
/// * `Err(HunterError)` - The request was invalid or the client could not be built
pub async fn scan(mut request: ScanRequest, settings: CrawlerConfig) -> Result<ScanResult, HunterError> {
    request.validate()?;
    let crawler = DirectoryCrawler::new(settings)?;
    Ok(crawler.scan(&request).await)
}
