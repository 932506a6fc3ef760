//! Link extraction from directory listing markup
//!
//! Listings produced by web servers (and hand-rolled index pages) are often
//! not well-formed HTML, so links are pulled out with tolerant patterns
//! instead of a DOM parse:
//! - `href` values of anchor tags
//! - `src` values of embedded resource tags, when requested
//! - bare `name.ext` occurrences for the scanned category, only when the
//!   two strategies above found nothing
//!
//! Attribute values are returned exactly as written. Nothing is resolved or
//! filtered here.

use crate::category::FileCategory;
use regex::Regex;
use std::sync::LazyLock;

/// Matches `<a ... href="...">` and captures the attribute value
#[allow(clippy::expect_used)]
static ANCHOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s(?:[^>]*?\s)?href\s*=\s*["']([^"']*)["']"#)
        .expect("anchor regex is valid") // Static pattern, safe to panic
});

/// Matches the `src` attribute of embedded resource tags
#[allow(clippy::expect_used)]
static EMBEDDED_SRC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<(?:img|script|iframe|video|audio|source|embed)\s(?:[^>]*?\s)?src\s*=\s*["']([^"']*)["']"#,
    )
    .expect("embedded src regex is valid") // Static pattern, safe to panic
});

/// Bare-URL fallback patterns, one per category, built from the extension table
#[allow(clippy::expect_used)]
static FALLBACK_PATTERNS: LazyLock<Vec<(FileCategory, Regex)>> = LazyLock::new(|| {
    FileCategory::ALL
        .into_iter()
        .map(|category| {
            let pattern = bare_url_pattern(category);
            let regex = Regex::new(&pattern).expect("fallback regex is valid"); // Built from static table
            (category, regex)
        })
        .collect()
});

/// Which strategies to run over a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionMode {
    /// Also collect `src` values of img/script/iframe/video/audio/source/embed
    pub include_embedded_src: bool,

    /// Category whose extensions drive the bare-URL fallback
    pub fallback: Option<FileCategory>,
}

impl ExtractionMode {
    /// Anchors only, with the fallback for `category`
    pub fn anchors(category: FileCategory) -> Self {
        Self {
            include_embedded_src: false,
            fallback: Some(category),
        }
    }

    /// Enables embedded resource extraction
    pub fn with_embedded_src(mut self, include: bool) -> Self {
        self.include_embedded_src = include;
        self
    }
}

/// Extracts candidate links from raw HTML
///
/// # Arguments
///
/// * `html` - The raw page body
/// * `mode` - Which extraction strategies to apply
///
/// # Returns
///
/// Raw (possibly relative) link strings in document order: anchors first,
/// then embedded sources. If both yield nothing, the bare-URL matches for
/// the fallback category are returned instead.
///
/// # Example
///
/// ```
/// use autohunter::category::FileCategory;
/// use autohunter::crawler::{extract_links, ExtractionMode};
///
/// let html = r#"<pre><a href="../">../</a><A HREF='data.zip'>data.zip</A></pre>"#;
/// let links = extract_links(html, ExtractionMode::anchors(FileCategory::Zip));
/// assert_eq!(links, vec!["../", "data.zip"]);
/// ```
pub fn extract_links(html: &str, mode: ExtractionMode) -> Vec<String> {
    let mut links = extract_anchor_links(html);

    if mode.include_embedded_src {
        links.extend(extract_embedded_links(html));
    }

    if links.is_empty() {
        if let Some(category) = mode.fallback {
            links = extract_bare_urls(html, category);
            tracing::debug!(
                "No tagged links found, fallback recovered {} {} links",
                links.len(),
                category
            );
        }
    }

    links
}

/// Collects `href` values of anchor tags
pub fn extract_anchor_links(html: &str) -> Vec<String> {
    capture_all(&ANCHOR_PATTERN, html)
}

/// Collects `src` values of embedded resource tags
pub fn extract_embedded_links(html: &str) -> Vec<String> {
    capture_all(&EMBEDDED_SRC_PATTERN, html)
}

/// Collects bare `something.ext[?query]` occurrences for a category
pub fn extract_bare_urls(html: &str, category: FileCategory) -> Vec<String> {
    FALLBACK_PATTERNS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, regex)| {
            regex
                .find_iter(html)
                .map(|m| m.as_str().to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn capture_all(regex: &Regex, html: &str) -> Vec<String> {
    regex
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn bare_url_pattern(category: FileCategory) -> String {
    let alternatives = category
        .extensions()
        .iter()
        .map(|ext| regex::escape(ext))
        .collect::<Vec<_>>()
        .join("|");
    format!(r#"(?i)[^"'>\s]+\.(?:{})(?:\?[^"'>\s]*)?"#, alternatives)
}
