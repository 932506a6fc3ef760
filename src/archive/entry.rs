//! Archive request entries
//!
//! Callers hand the packager files in three shapes, all of which must keep
//! working:
//! - a bare URL string: `"https://host/a.zip"`
//! - a JSON-encoded descriptor string: `"{\"url\": \"https://host/a.zip\"}"`
//! - a structured object: `{"url": "https://host/a.zip", "filename": "a.zip"}`
//!
//! The whole payload may also arrive as a JSON-encoded array string, or as an
//! object carrying the list under `files` or `selected_files`.

use crate::url::is_valid_url;
use crate::HunterError;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Path suffix that marks a CMS "view" page rather than the file itself
const VIEW_SUFFIX: &str = "/view";

/// Replacement suffix that downloads the underlying file
const DOWNLOAD_SUFFIX: &str = "/@@download/file";

/// Payload fields that may carry the entry list
const LIST_FIELDS: &[&str] = &["files", "selected_files"];

/// One archive request element, in the shape it arrived in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRef {
    /// A plain URL string
    BareUrl(String),
    /// A string holding a JSON descriptor object
    EncodedJson(String),
    /// A descriptor object
    Structured {
        url: String,
        filename: Option<String>,
    },
}

/// Descriptor fields read from structured and encoded entries
///
/// Extra fields (such as `size` from a scan result) are ignored.
#[derive(Debug, Deserialize)]
struct DescriptorFields {
    url: String,
    #[serde(default)]
    filename: Option<String>,
}

impl FileRef {
    /// Classifies a text entry as a bare URL or an encoded descriptor
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.starts_with('{') {
            Self::EncodedJson(trimmed.to_string())
        } else {
            Self::BareUrl(trimmed.to_string())
        }
    }

    /// Classifies one JSON element of a request list
    ///
    /// Returns `None` for elements that match none of the shapes.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::from_text(text)),
            Value::Object(_) => {
                let fields = DescriptorFields::deserialize(value).ok()?;
                Some(Self::Structured {
                    url: fields.url,
                    filename: fields.filename,
                })
            }
            _ => None,
        }
    }

    /// Reduces the entry to its canonical `{url, filename}` form
    ///
    /// Returns `None` if the entry does not decode or has no valid URL.
    pub fn normalize(&self) -> Option<ArchiveEntry> {
        let (url, filename) = match self {
            Self::BareUrl(url) => (url.clone(), None),
            Self::EncodedJson(json) => {
                let fields: DescriptorFields = serde_json::from_str(json).ok()?;
                (fields.url, fields.filename)
            }
            Self::Structured { url, filename } => (url.clone(), filename.clone()),
        };

        let url = url.trim().to_string();
        if !is_valid_url(&url) {
            return None;
        }

        let filename = filename
            .map(|name| sanitize_filename(&name))
            .filter(|name| !name.is_empty());

        Some(ArchiveEntry { url, filename })
    }
}

/// A normalized archive entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Absolute URL as supplied
    pub url: String,
    /// Caller-chosen name inside the archive, if any
    pub filename: Option<String>,
}

impl ArchiveEntry {
    /// Resolves the archive name and the URL to fetch
    ///
    /// # Arguments
    ///
    /// * `position` - 1-based position in the batch, used for synthesized names
    pub fn prepare(&self, position: usize) -> PreparedEntry {
        let filename = self
            .filename
            .clone()
            .unwrap_or_else(|| derive_filename(&self.url, position));

        PreparedEntry {
            filename,
            fetch_url: rewrite_view_url(&self.url),
        }
    }
}

/// An entry ready to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedEntry {
    /// Name to store the payload under (never empty)
    pub filename: String,
    /// URL after the `/view` rewrite
    pub fetch_url: String,
}

/// Entries that survived normalization, plus how many did not
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedBatch {
    pub entries: Vec<ArchiveEntry>,
    pub skipped: usize,
}

/// Normalizes a list of entries, dropping the ones that cannot be used
pub fn normalize_refs<I>(refs: I) -> NormalizedBatch
where
    I: IntoIterator<Item = Option<FileRef>>,
{
    let mut batch = NormalizedBatch::default();

    for file_ref in refs {
        match file_ref.as_ref().and_then(FileRef::normalize) {
            Some(entry) => batch.entries.push(entry),
            None => {
                tracing::debug!("Skipping unusable archive entry: {:?}", file_ref);
                batch.skipped += 1;
            }
        }
    }

    batch
}

/// Normalizes a whole request payload
///
/// Accepts a JSON array, a string holding a JSON array, or an object with
/// the list under `files` or `selected_files`.
///
/// # Returns
///
/// * `Ok(NormalizedBatch)` - The usable entries (possibly none)
/// * `Err(HunterError::InvalidPayload)` - The payload is not a list in any accepted form
pub fn normalize_payload(payload: &Value) -> Result<NormalizedBatch, HunterError> {
    let list = payload_list(payload)?;
    Ok(normalize_refs(list.iter().map(FileRef::from_value)))
}

fn payload_list(payload: &Value) -> Result<Vec<Value>, HunterError> {
    match payload {
        Value::Array(items) => Ok(items.clone()),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(_) => Err(HunterError::InvalidPayload(
                "encoded file list is not a JSON array".to_string(),
            )),
            Err(e) => Err(HunterError::InvalidPayload(format!(
                "file list is not valid JSON: {}",
                e
            ))),
        },
        Value::Object(fields) => {
            let list = LIST_FIELDS
                .iter()
                .find_map(|name| fields.get(*name))
                .ok_or_else(|| {
                    HunterError::InvalidPayload(
                        "expected a 'files' or 'selected_files' list".to_string(),
                    )
                })?;
            match list {
                Value::Array(_) | Value::String(_) => payload_list(list),
                _ => Err(HunterError::InvalidPayload(
                    "file list must be an array".to_string(),
                )),
            }
        }
        _ => Err(HunterError::InvalidPayload(
            "file list must be an array".to_string(),
        )),
    }
}

/// Rewrites a CMS `/view` URL to its `/@@download/file` form
///
/// # Examples
///
/// ```
/// use autohunter::archive::rewrite_view_url;
///
/// assert_eq!(
///     rewrite_view_url("https://cms.example.org/docs/report.pdf/view"),
///     "https://cms.example.org/docs/report.pdf/@@download/file"
/// );
/// assert_eq!(
///     rewrite_view_url("https://example.org/a.zip"),
///     "https://example.org/a.zip"
/// );
/// ```
pub fn rewrite_view_url(url: &str) -> String {
    match url.strip_suffix(VIEW_SUFFIX) {
        Some(prefix) => format!("{}{}", prefix, DOWNLOAD_SUFFIX),
        None => url.to_string(),
    }
}

/// Derives an archive name from a URL's path
///
/// For `.../<name>/view` the segment before `view` is used. When no usable
/// segment exists the name is `file_<position>`.
pub fn derive_filename(url: &str, position: usize) -> String {
    let fallback = || format!("file_{}", position);

    let Ok(parsed) = Url::parse(url) else {
        return fallback();
    };

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.collect())
        .unwrap_or_default();

    let basename = segments.last().copied().unwrap_or("");

    let name = if basename == "view" {
        segments[..segments.len() - 1]
            .iter()
            .rev()
            .find(|segment| !segment.is_empty())
            .copied()
            .unwrap_or("")
    } else {
        basename
    };

    if name.is_empty() {
        fallback()
    } else {
        name.to_string()
    }
}

/// Keeps only the final path component of a caller-supplied name
fn sanitize_filename(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}
