//! Bulk fetch-and-archive pipeline
//!
//! Entries are fetched one at a time. A failed fetch is recorded and the
//! batch moves on; the batch as a whole only fails when nothing could be
//! fetched.

use crate::archive::entry::{normalize_payload, ArchiveEntry, PreparedEntry};
use crate::config::ArchiveConfig;
use crate::crawler::{build_http_client, fetch_bytes};
use crate::HunterError;
use chrono::{Datelike, Timelike, Utc};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use url::Url;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Outcome of a packaging run with at least one success
#[derive(Debug, Clone, Default)]
pub struct ArchiveResult {
    /// The finished ZIP archive
    pub archive_bytes: Vec<u8>,

    /// Entries fetched and written
    pub downloaded_count: usize,

    /// Entries whose fetch failed
    pub failed_count: usize,

    /// Payload elements dropped during normalization
    pub skipped_count: usize,

    /// One message per failed entry
    pub errors: Vec<String>,

    /// Names written into the archive, in order
    pub entry_names: Vec<String>,
}

/// Fetches files and bundles them into a single in-memory ZIP
pub struct ArchivePackager {
    client: Client,
    settings: ArchiveConfig,
}

impl ArchivePackager {
    /// Creates a packager with its own HTTP client
    pub fn new(settings: ArchiveConfig) -> Result<Self, HunterError> {
        let client = build_http_client(&settings.user_agent)?;
        Ok(Self::with_client(client, settings))
    }

    /// Creates a packager that shares an existing HTTP client
    ///
    /// The configured browser-like User-Agent is still sent with every download.
    pub fn with_client(client: Client, settings: ArchiveConfig) -> Self {
        Self { client, settings }
    }

    /// Returns the packager settings
    pub fn settings(&self) -> &ArchiveConfig {
        &self.settings
    }

    /// Normalizes a raw request payload and packages the usable entries
    ///
    /// # Returns
    ///
    /// * `Ok(ArchiveResult)` - At least one entry was fetched
    /// * `Err(HunterError::InvalidPayload)` - The payload holds no usable entry
    /// * `Err(HunterError::NothingDownloaded)` - Every fetch failed
    pub async fn package_payload(&self, payload: &Value) -> Result<ArchiveResult, HunterError> {
        let batch = normalize_payload(payload)?;

        if batch.entries.is_empty() {
            return Err(HunterError::InvalidPayload(format!(
                "no usable file entries ({} skipped)",
                batch.skipped
            )));
        }

        let mut result = self.package(&batch.entries).await?;
        result.skipped_count = batch.skipped;
        Ok(result)
    }

    /// Fetches every entry and writes the successes into one archive
    ///
    /// # Arguments
    ///
    /// * `entries` - Normalized entries, in archive order
    ///
    /// # Returns
    ///
    /// * `Ok(ArchiveResult)` - At least one entry was fetched
    /// * `Err(HunterError::NothingDownloaded)` - Every fetch failed (or there were no entries)
    /// * `Err(HunterError::Archive)` - The archive itself could not be written
    pub async fn package(&self, entries: &[ArchiveEntry]) -> Result<ArchiveResult, HunterError> {
        tracing::info!("Packaging {} files", entries.len());

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = entry_options();
        let mut used_names = HashSet::new();
        let mut result = ArchiveResult::default();

        for (index, entry) in entries.iter().enumerate() {
            let prepared = entry.prepare(index + 1);

            match self.fetch(&prepared).await {
                Ok(bytes) => {
                    let name = unique_name(&mut used_names, &prepared.filename);
                    zip.start_file(name.as_str(), options)?;
                    zip.write_all(&bytes)?;

                    tracing::info!("Added {} ({} bytes)", name, bytes.len());
                    result.entry_names.push(name);
                    result.downloaded_count += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to download {}: {}", prepared.filename, e);
                    result.errors.push(format!("{}: {}", prepared.filename, e));
                    result.failed_count += 1;
                }
            }
        }

        if result.downloaded_count == 0 {
            return Err(HunterError::NothingDownloaded {
                errors: result.errors,
            });
        }

        result.archive_bytes = zip.finish()?.into_inner();

        tracing::info!(
            "Archive ready: {} downloaded, {} failed, {} bytes",
            result.downloaded_count,
            result.failed_count,
            result.archive_bytes.len()
        );

        Ok(result)
    }

    async fn fetch(&self, prepared: &PreparedEntry) -> Result<Vec<u8>, HunterError> {
        let url = Url::parse(&prepared.fetch_url)?;
        fetch_bytes(
            &self.client,
            &url,
            self.settings.request_timeout(),
            Some(&self.settings.user_agent),
        )
        .await
    }
}

/// Deflate entries stamped with the current time
fn entry_options() -> FileOptions {
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let now = Utc::now();
    // ZIP timestamps cannot represent years outside 1980..=2107
    match zip::DateTime::from_date_and_time(
        u16::try_from(now.year()).unwrap_or(1980),
        now.month() as u8,
        now.day() as u8,
        now.hour() as u8,
        now.minute() as u8,
        now.second() as u8,
    ) {
        Ok(timestamp) => options.last_modified_time(timestamp),
        Err(_) => options,
    }
}

/// Returns `name`, or `name (n).ext` if it is already taken
fn unique_name(used: &mut HashSet<String>, name: &str) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }

    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => (&name[..dot], &name[dot..]),
        _ => (name, ""),
    };

    let mut n = 1;
    loop {
        let candidate = format!("{} ({}){}", stem, n, ext);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
