//! URL handling module for AutoHunter
//!
//! This module provides structural URL validation, the advisory security
//! predicates (embedded credentials, private network addresses), relative
//! link resolution, and the path helpers the crawler and packager use to
//! derive filenames.

mod resolve;
mod validate;

// Re-export main functions
pub use resolve::{basic_auth, link_basename, path_basename, resolve_relative};
pub use validate::{
    has_embedded_credentials, is_private_network_address, is_valid_url, parse_http_url,
    redact_credentials,
};

/// Advisory findings about a URL that is about to be scanned
///
/// These are reported to the caller (and logged) but never used to refuse a
/// scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UrlAdvisory {
    /// The URL looks like it targets a private network address
    pub private_network: bool,
    /// The URL carries a username and/or password in its authority
    pub embedded_credentials: bool,
}

impl UrlAdvisory {
    /// Evaluates both advisory predicates for `url`
    pub fn inspect(url: &str) -> Self {
        Self {
            private_network: is_private_network_address(url),
            embedded_credentials: has_embedded_credentials(url),
        }
    }

    /// Emits a warning log line for each finding
    pub fn log(&self, url: &str) {
        if !self.any() {
            return;
        }

        let shown = redact_credentials(url);
        if self.private_network {
            tracing::warn!(
                "Internal URL detected: {} (may not be reachable from a hosted deployment)",
                shown
            );
        }
        if self.embedded_credentials {
            tracing::warn!(
                "URL contains embedded credentials: {} (avoid sharing it in logs)",
                shown
            );
        }
    }

    /// Returns true if any finding is set
    pub fn any(&self) -> bool {
        self.private_network || self.embedded_credentials
    }
}
