use crate::UrlError;
use url::Url;

/// Joins a possibly-relative link onto a base URL (RFC 3986 resolution)
///
/// # Examples
///
/// ```
/// use autohunter::url::resolve_relative;
///
/// let url = resolve_relative("https://example.com/pub/", "docs/a.pdf").unwrap();
/// assert_eq!(url, "https://example.com/pub/docs/a.pdf");
///
/// let url = resolve_relative("https://example.com/pub/", "../b.zip").unwrap();
/// assert_eq!(url, "https://example.com/b.zip");
/// ```
pub fn resolve_relative(base_url: &str, href: &str) -> Result<String, UrlError> {
    let base = Url::parse(base_url).map_err(|e| UrlError::Parse(format!("{}: {}", base_url, e)))?;
    let joined = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;
    Ok(joined.to_string())
}

/// Returns the final segment of a URL's path (empty for directory URLs)
pub fn path_basename(url: &Url) -> &str {
    url.path().rsplit('/').next().unwrap_or("")
}

/// Derives a candidate filename from a raw link as written in a listing
///
/// The query string and fragment are dropped, trailing slashes are stripped,
/// and the last path segment is returned. `sub/` therefore yields `sub`.
pub fn link_basename(href: &str) -> &str {
    let path = href.split(['?', '#']).next().unwrap_or("");
    path.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}

/// Extracts basic-auth credentials embedded in a URL's authority
///
/// Returns `None` when the URL has no username.
pub fn basic_auth(url: &Url) -> Option<(String, Option<String>)> {
    if url.username().is_empty() {
        return None;
    }
    Some((
        url.username().to_string(),
        url.password().map(str::to_string),
    ))
}
