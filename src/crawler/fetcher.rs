//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by the crawler and the archive
//! packager, including:
//! - Building HTTP clients with the configured user agent
//! - GET requests that tell listings apart from direct file responses
//! - HEAD probes for file sizes
//! - Whole-body downloads for archiving
//! - Propagating basic-auth credentials embedded in URLs
//! - Error classification

use crate::url::basic_auth;
use crate::HunterError;
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect::Policy, Client, Method, RequestBuilder, StatusCode};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for any request
const MAX_REDIRECTS: usize = 10;

/// Result of a successful GET against a crawl node
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered with an HTML page
    Listing {
        /// Final URL after redirects
        final_url: String,
        /// Content-Type header value (lowercased)
        content_type: String,
        /// Page body content
        body: String,
    },

    /// The server answered with something other than HTML
    File {
        /// Content-Type header value (lowercased, empty if absent)
        content_type: String,
        /// Declared Content-Length (0 if absent)
        content_length: u64,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Timeouts are set per request, so the client only carries a connect
/// timeout. Redirects are followed up to a fixed limit.
///
/// # Arguments
///
/// * `user_agent` - Value sent in the User-Agent header by default
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use autohunter::crawler::build_http_client;
///
/// let client = build_http_client("AutoHunter/0.1").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a crawl node and classifies the response
///
/// # Request Flow
///
/// 1. GET with the given timeout and any credentials embedded in `url`
/// 2. Non-2xx status → `Err(HunterError::Status)`
/// 3. Content-Type without `text/html` → `FetchResult::File` (body not read)
/// 4. Otherwise the body is read → `FetchResult::Listing`
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `timeout` - Whole-request timeout
pub async fn fetch_url(
    client: &Client,
    url: &Url,
    timeout: Duration,
) -> Result<FetchResult, HunterError> {
    let response = authorized(client, Method::GET, url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HunterError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let content_type = header_string(response.headers(), CONTENT_TYPE.as_str()).to_lowercase();

    if !content_type.contains("text/html") {
        let content_length = declared_length(response.headers());
        return Ok(FetchResult::File {
            content_type,
            content_length,
        });
    }

    let body = response.text().await.map_err(|e| classify_error(url, e))?;

    Ok(FetchResult::Listing {
        final_url,
        content_type,
        body,
    })
}

/// Sends a HEAD request to learn a file's size
///
/// Any failure (network error, timeout, non-200 status, missing or
/// unparseable Content-Length) yields 0.
pub async fn probe_size(client: &Client, url: &Url, timeout: Duration) -> u64 {
    let response = authorized(client, Method::HEAD, url)
        .timeout(timeout)
        .send()
        .await;

    match response {
        Ok(response) if response.status() == StatusCode::OK => declared_length(response.headers()),
        Ok(response) => {
            tracing::debug!("HEAD {} returned {}", url, response.status());
            0
        }
        Err(e) => {
            tracing::debug!("HEAD {} failed: {}", url, e);
            0
        }
    }
}

/// Downloads a whole response body
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to download
/// * `timeout` - Whole-request timeout
/// * `user_agent` - Overrides the client's default User-Agent when set
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - The response payload
/// * `Err(HunterError)` - Network failure, timeout, or non-2xx status
pub async fn fetch_bytes(
    client: &Client,
    url: &Url,
    timeout: Duration,
    user_agent: Option<&str>,
) -> Result<Vec<u8>, HunterError> {
    let mut request = authorized(client, Method::GET, url).timeout(timeout);
    if let Some(agent) = user_agent {
        request = request.header(USER_AGENT, agent);
    }

    let response = request.send().await.map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HunterError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(|e| classify_error(url, e))?;
    Ok(bytes.to_vec())
}

/// Builds a request, moving credentials embedded in the URL into a basic-auth header
fn authorized(client: &Client, method: Method, url: &Url) -> RequestBuilder {
    let Some((username, password)) = basic_auth(url) else {
        return client.request(method, url.as_str());
    };

    let mut bare = url.clone();
    // Both setters only fail for cannot-be-a-base URLs, which carry no credentials
    let _ = bare.set_username("");
    let _ = bare.set_password(None);
    client
        .request(method, bare.as_str())
        .basic_auth(username, password)
}

/// Maps a reqwest failure onto the crate's error taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> HunterError {
    let shown = crate::url::redact_credentials(url.as_str());
    if error.is_timeout() {
        HunterError::Timeout { url: shown }
    } else {
        HunterError::Http {
            url: shown,
            source: error,
        }
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

fn declared_length(headers: &HeaderMap) -> u64 {
    header_string(headers, CONTENT_LENGTH.as_str())
        .trim()
        .parse()
        .unwrap_or(0)
}
