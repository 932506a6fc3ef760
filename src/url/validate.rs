use crate::UrlError;
use url::Url;

/// Address prefixes treated as private networks by the advisory check
const PRIVATE_PREFIXES: &[&str] = &["172.17.", "192.168.", "10."];

/// Returns true if the string parses into a URL with both a scheme and a host
///
/// Malformed input yields `false`, never an error.
///
/// # Examples
///
/// ```
/// use autohunter::url::is_valid_url;
///
/// assert!(is_valid_url("https://example.com/files/"));
/// assert!(!is_valid_url("example.com/files/"));
/// assert!(!is_valid_url("mailto:someone@example.com"));
/// ```
pub fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            !parsed.scheme().is_empty() && parsed.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

/// Parses a caller-supplied URL, rejecting blank or authority-less input
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL
/// * `Err(UrlError)` - The input was empty, unparseable, or had no host
pub fn parse_http_url(url: &str) -> Result<Url, UrlError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let parsed = Url::parse(trimmed).map_err(|e| UrlError::Parse(format!("{}: {}", trimmed, e)))?;
    if !is_valid_url(trimmed) {
        return Err(UrlError::MissingAuthority(trimmed.to_string()));
    }

    Ok(parsed)
}

/// Returns true if the URL's authority carries a username or password
pub fn has_embedded_credentials(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => !parsed.username().is_empty() || parsed.password().is_some(),
        Err(_) => false,
    }
}

/// Heuristic check for URLs that point at private network addresses
///
/// This is a plain substring test for `172.17.`, `192.168.` and `10.`
/// anywhere in the string, so it over-reports (e.g. `v10.zip`). The result
/// is advisory only.
pub fn is_private_network_address(url: &str) -> bool {
    PRIVATE_PREFIXES.iter().any(|prefix| url.contains(prefix))
}

/// Replaces the password of a URL with `***` for logging
///
/// Unparseable input is returned unchanged.
pub fn redact_credentials(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            // set_password only fails for cannot-be-a-base URLs, which have no password
            let _ = parsed.set_password(Some("***"));
            parsed.to_string()
        }
        _ => url.to_string(),
    }
}
