//! Archive module: bundles selected files into one ZIP download
//!
//! - Request entry normalization across the accepted shapes
//! - Filename derivation and the CMS `/view` URL rewrite
//! - Sequential fetching with per-entry failure isolation

mod entry;
mod packager;

pub use entry::{
    derive_filename, normalize_payload, normalize_refs, rewrite_view_url, ArchiveEntry, FileRef,
    NormalizedBatch, PreparedEntry,
};
pub use packager::{ArchivePackager, ArchiveResult};
