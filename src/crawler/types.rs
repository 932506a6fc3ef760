use crate::category::FileCategory;
use crate::url::parse_http_url;
use crate::UrlError;
use serde::{Deserialize, Serialize};

/// Default recursion bound for a scan
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// One discovered downloadable file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Name of the file as it appeared in the listing
    pub filename: String,

    /// Absolute URL of the file
    pub url: String,

    /// Size in bytes (0 when unknown)
    #[serde(default)]
    pub size: u64,
}

/// Parameters for a single directory scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    /// Listing (or direct file) URL to start from
    pub root_url: String,

    /// Which file types to collect
    pub category: FileCategory,

    /// Also collect `src` attributes of embedded resources
    pub include_embedded_src: bool,

    /// Number of listing levels to visit, counting the root
    pub max_depth: u32,
}

impl ScanRequest {
    /// Creates a request with default options (no embedded sources, depth 3)
    pub fn new(root_url: impl Into<String>, category: FileCategory) -> Self {
        Self {
            root_url: root_url.into(),
            category,
            include_embedded_src: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets whether embedded resource links are extracted
    pub fn with_embedded_src(mut self, include: bool) -> Self {
        self.include_embedded_src = include;
        self
    }

    /// Sets the recursion bound
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Checks that the root URL is present and structurally valid
    ///
    /// Surrounding whitespace is trimmed from the root URL.
    pub fn validate(&mut self) -> Result<(), UrlError> {
        parse_http_url(&self.root_url)?;
        self.root_url = self.root_url.trim().to_string();
        Ok(())
    }
}

/// Outcome of a scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Descriptors in link-encounter order
    pub files: Vec<FileDescriptor>,

    /// Number of descriptors in `files`
    pub count: usize,
}

impl From<Vec<FileDescriptor>> for ScanResult {
    fn from(files: Vec<FileDescriptor>) -> Self {
        let count = files.len();
        Self { files, count }
    }
}
