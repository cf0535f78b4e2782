//! Atomic file writes (temp + rename)
//!
//! A reader of the target path sees either the previous content or the new
//! content, never a partially written file.

use crate::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sibling path with `suffix` appended to the full file name
///
/// `data/marine.json` + `.bak` → `data/marine.json.bak`
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Write `contents` to `path` atomically
///
/// Writes into `<path>.tmp` in the same directory, syncs it, then renames it
/// over `path`. Parent directories are created when missing. On failure the
/// temp file is removed and the target is left untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = with_suffix(path, ".tmp");

    let written = (|| -> std::io::Result<()> {
        let mut file = File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        Ok(())
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    tracing::debug!(path = %path.display(), bytes = contents.len(), "Atomic write complete");
    Ok(())
}
