//! File category classification
//!
//! The extension table in [`FileCategory::extensions`] is the single source of
//! truth for what each category collects. Both link classification and the
//! bare-URL fallback pattern in the link extractor are derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::HunterError;

/// The file-type filter applied to a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// Compressed archives
    #[default]
    Zip,
    /// Raster and vector images
    Images,
    /// PDF documents
    Pdf,
}

impl FileCategory {
    /// All categories, in declaration order
    pub const ALL: [FileCategory; 3] = [Self::Zip, Self::Images, Self::Pdf];

    /// Lowercase extensions (without the dot) accepted by this category
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Zip => &["zip", "7z", "rar", "tar", "gz", "bz2"],
            Self::Images => &["png", "jpg", "jpeg", "gif", "bmp", "webp", "svg"],
            Self::Pdf => &["pdf"],
        }
    }

    /// Returns the category name as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Images => "images",
            Self::Pdf => "pdf",
        }
    }

    /// Returns true if `filename` has one of this category's extensions
    ///
    /// The extension is the text after the final `.`, compared
    /// case-insensitively. Names like `.zip` have no extension.
    pub fn matches(&self, filename: &str) -> bool {
        match file_extension(filename) {
            Some(ext) => self.extensions().contains(&ext.as_str()),
            None => false,
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = HunterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| HunterError::UnknownCategory(s.to_string()))
    }
}

/// Decides whether a file belongs to the named category
///
/// Unknown category names never match.
///
/// # Examples
///
/// ```
/// use autohunter::should_include;
///
/// assert!(should_include("backup.TAR", "zip"));
/// assert!(should_include("photo.jpeg", "images"));
/// assert!(!should_include("notes.txt", "pdf"));
/// assert!(!should_include("report.pdf", "documents"));
/// ```
pub fn should_include(filename: &str, category: &str) -> bool {
    category
        .parse::<FileCategory>()
        .is_ok_and(|category| category.matches(filename))
}

/// Lowercased extension of a filename, if it has one
fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_ascii_lowercase())
}
