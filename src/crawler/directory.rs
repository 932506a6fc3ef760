//! Recursive directory crawler
//!
//! Walks an HTTP directory listing depth-first, collecting descriptors for
//! files of the requested category:
//! - A non-HTML response is a direct file: it is classified by its URL's
//!   basename and never treated as a directory
//! - An HTML response is a listing: its links are extracted, matching files
//!   are emitted (optionally HEAD-probed for size), and links ending in `/`
//!   are descended into while the depth bound allows
//!
//! Every visited node is isolated: a failed fetch contributes nothing and
//! the rest of the traversal carries on. There is no visited set, so a link
//! graph with back-edges inside the depth bound is fetched again each time
//! it is reached. Each call returns its own descriptors and the caller
//! concatenates them, so no accumulator is shared across the recursion.

use crate::config::CrawlerConfig;
use crate::crawler::extract::{extract_links, ExtractionMode};
use crate::crawler::fetcher::{build_http_client, fetch_url, probe_size, FetchResult};
use crate::crawler::types::{FileDescriptor, ScanRequest, ScanResult};
use crate::url::{link_basename, path_basename, redact_credentials, resolve_relative};
use crate::HunterError;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use url::Url;

/// Links that never lead anywhere new
const NOOP_LINKS: &[&str] = &["../", "./", "/"];

type NodeFuture<'a> = Pin<Box<dyn Future<Output = Vec<FileDescriptor>> + Send + 'a>>;

/// Crawls directory listings for downloadable files
pub struct DirectoryCrawler {
    client: Client,
    settings: CrawlerConfig,
}

impl DirectoryCrawler {
    /// Creates a crawler with its own HTTP client
    ///
    /// # Returns
    ///
    /// * `Ok(DirectoryCrawler)` - Ready to scan
    /// * `Err(HunterError)` - The HTTP client could not be built
    pub fn new(settings: CrawlerConfig) -> Result<Self, HunterError> {
        let client = build_http_client(&settings.user_agent)?;
        Ok(Self::with_client(client, settings))
    }

    /// Creates a crawler that shares an existing HTTP client
    pub fn with_client(client: Client, settings: CrawlerConfig) -> Self {
        Self { client, settings }
    }

    /// Returns the crawler settings
    pub fn settings(&self) -> &CrawlerConfig {
        &self.settings
    }

    /// Runs a complete scan from the request's root URL
    ///
    /// Failures below the root are logged and skipped, so the result holds
    /// whatever could be found. The request is expected to be validated.
    pub async fn scan(&self, request: &ScanRequest) -> ScanResult {
        tracing::info!(
            "Starting scan of {} (type: {}, max depth: {}, embedded src: {})",
            redact_credentials(&request.root_url),
            request.category,
            request.max_depth,
            request.include_embedded_src
        );

        let files = self.crawl(request.root_url.clone(), request, 0).await;

        tracing::info!("Scan finished: {} files found", files.len());
        ScanResult::from(files)
    }

    /// Visits one node; the only depth-based stop is `depth >= max_depth`
    fn crawl<'a>(&'a self, url: String, request: &'a ScanRequest, depth: u32) -> NodeFuture<'a> {
        Box::pin(async move {
            if depth >= request.max_depth {
                return Vec::new();
            }

            match self.visit(&url, request, depth).await {
                Ok(files) => files,
                Err(e) => {
                    tracing::warn!("Error scanning {}: {}", redact_credentials(&url), e);
                    Vec::new()
                }
            }
        })
    }

    async fn visit(
        &self,
        url: &str,
        request: &ScanRequest,
        depth: u32,
    ) -> Result<Vec<FileDescriptor>, HunterError> {
        let parsed = Url::parse(url)?;
        tracing::info!("Scanning: {} (depth: {})", redact_credentials(url), depth);

        match fetch_url(&self.client, &parsed, self.settings.request_timeout()).await? {
            FetchResult::File {
                content_type,
                content_length,
            } => Ok(direct_file(url, &parsed, &content_type, content_length, request)),
            FetchResult::Listing {
                final_url, body, ..
            } => {
                if final_url != parsed.as_str() {
                    tracing::debug!("{} redirected to {}", redact_credentials(url), final_url);
                }
                Ok(self.walk_listing(url, &body, request, depth).await)
            }
        }
    }

    /// Classifies every link of a listing page, descending into subdirectories
    async fn walk_listing(
        &self,
        url: &str,
        body: &str,
        request: &ScanRequest,
        depth: u32,
    ) -> Vec<FileDescriptor> {
        let mode = ExtractionMode::anchors(request.category)
            .with_embedded_src(request.include_embedded_src);
        let links = extract_links(body, mode);
        tracing::debug!("Found {} links on {}", links.len(), redact_credentials(url));

        let mut files = Vec::new();

        for href in links {
            if href.is_empty() || NOOP_LINKS.contains(&href.as_str()) {
                continue;
            }

            let resolved = match resolve_relative(url, &href) {
                Ok(resolved) => resolved,
                Err(e) => {
                    tracing::debug!("Skipping unresolvable link {}: {}", href, e);
                    continue;
                }
            };

            let filename = link_basename(&href);
            if filename.is_empty() {
                continue;
            }

            if request.category.matches(filename) {
                let size = self.file_size(&resolved).await;
                tracing::info!("File found: {} ({} bytes)", filename, size);
                files.push(FileDescriptor {
                    filename: filename.to_string(),
                    url: resolved,
                    size,
                });
            } else if href.ends_with('/') && depth + 1 < request.max_depth {
                files.extend(self.crawl(resolved, request, depth + 1).await);
            } else {
                tracing::trace!("Dropping link {}", href);
            }
        }

        files
    }

    async fn file_size(&self, url: &str) -> u64 {
        if !self.settings.probe_sizes {
            return 0;
        }

        match Url::parse(url) {
            Ok(parsed) => probe_size(&self.client, &parsed, self.settings.probe_timeout()).await,
            Err(_) => 0,
        }
    }
}

/// Handles a non-HTML response: at most one descriptor, never a recursion
fn direct_file(
    url: &str,
    parsed: &Url,
    content_type: &str,
    content_length: u64,
    request: &ScanRequest,
) -> Vec<FileDescriptor> {
    let filename = path_basename(parsed);

    if filename.is_empty() || !request.category.matches(filename) {
        tracing::debug!(
            "Ignoring non-HTML response from {} ({})",
            redact_credentials(url),
            content_type
        );
        return Vec::new();
    }

    tracing::info!("Direct file found: {} ({} bytes)", filename, content_length);
    vec![FileDescriptor {
        filename: filename.to_string(),
        url: url.to_string(),
        size: content_length,
    }]
}
