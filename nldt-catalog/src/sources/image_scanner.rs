//! Image directory scanner
//!
//! Lists the `.jpg`/`.jpeg` assets directly inside a domain's image
//! directory. Each file stem becomes an asset-backed candidate, verbatim.

use super::{CandidateBatch, SourceError};
use crate::models::SkippedEntry;
use crate::services::identity::identifier_from_asset;
use crate::services::reconciler::CandidateRecord;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub struct ImageScanner {
    extensions: Vec<&'static str>,
}

impl Default for ImageScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageScanner {
    pub fn new() -> Self {
        Self {
            extensions: vec!["jpg", "jpeg"],
        }
    }

    fn is_image(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
    }

    /// Image files in `dir`, sorted by file name
    pub fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
        if !dir.is_dir() {
            return Err(SourceError::Directory {
                path: dir.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            match entry {
                Ok(entry) if self.is_image(&entry) => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "Error accessing entry"),
            }
        }

        tracing::debug!(dir = %dir.display(), images = files.len(), "Image scan complete");
        Ok(files)
    }

    /// Asset-backed candidates for every image in `dir`
    pub fn candidates(&self, dir: &Path) -> Result<CandidateBatch, SourceError> {
        let mut batch = CandidateBatch::default();
        for path in self.scan(dir)? {
            match identifier_from_asset(&path) {
                Some(identifier) => batch.candidates.push(CandidateRecord::from_asset(identifier)),
                None => batch
                    .skipped
                    .push(SkippedEntry::new(path.display().to_string(), "no usable file stem")),
            }
        }
        Ok(batch)
    }
}
