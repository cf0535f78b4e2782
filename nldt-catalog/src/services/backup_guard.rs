//! Backup-before-write guard
//!
//! Before a catalog is replaced, its current on-disk content is copied once
//! to `<path>.bak`. An existing backup is never overwritten, so the first
//! pristine snapshot survives any number of later runs. The write itself
//! goes through a temp file and a rename.

use crate::error::{CatalogError, CatalogResult};
use nldt_common::fs::{with_suffix, write_atomic};
use std::path::{Path, PathBuf};
use tracing::info;

/// Suffix appended to the catalog file name
pub const BACKUP_SUFFIX: &str = ".bak";

pub fn backup_path(path: &Path) -> PathBuf {
    with_suffix(path, BACKUP_SUFFIX)
}

/// What the guard did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardOutcome {
    /// A new backup was taken during this call
    pub backup_created: bool,
}

/// Preserve the first snapshot of `path`, then replace it with `content`
///
/// A missing target has nothing to preserve and creates no backup. The
/// backup is "the file as it was before the guard first replaced it": for a
/// catalog created by this call, that is the content written now, so the
/// next call snapshots it.
pub fn guard_write(path: &Path, content: &[u8]) -> CatalogResult<GuardOutcome> {
    let backup = backup_path(path);
    let mut backup_created = false;

    if path.exists() && !backup.exists() {
        let original = std::fs::read(path).map_err(|e| write_error(&backup, e.into()))?;
        write_atomic(&backup, &original).map_err(|e| write_error(&backup, e))?;
        info!(backup = %backup.display(), "Saved first snapshot before overwrite");
        backup_created = true;
    }

    write_atomic(path, content).map_err(|e| write_error(path, e))?;

    Ok(GuardOutcome { backup_created })
}

fn write_error(path: &Path, source: nldt_common::Error) -> CatalogError {
    CatalogError::Write {
        path: path.to_path_buf(),
        source,
    }
}
