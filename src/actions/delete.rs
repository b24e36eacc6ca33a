//! Permanent deletion of duplicate files.
//!
//! # Overview
//!
//! [`delete_all`] removes every path in a batch:
//! - A path that no longer exists is skipped with a warning, not an error
//! - On Windows a read-only attribute is cleared before removal
//! - Any other failure is recorded and the batch continues
//!
//! # Example
//!
//! ```no_run
//! use dupemgr::actions::delete::delete_all;
//! use std::path::PathBuf;
//!
//! let result = delete_all(&[PathBuf::from("/path/to/duplicate.txt")]);
//! for (path, message) in &result.errors {
//!     eprintln!("{}: {}", path.display(), message);
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::ActionError;

/// Results of a batch deletion.
#[derive(Debug, Clone, Default)]
pub struct BatchDeleteResult {
    /// Paths removed from disk.
    pub deleted: Vec<PathBuf>,
    /// Paths that were already gone.
    pub skipped: Vec<PathBuf>,
    /// Failed deletions with their messages.
    pub errors: Vec<(PathBuf, String)>,
}

impl BatchDeleteResult {
    /// Number of successful deletions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.deleted.len()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.errors.len()
    }

    /// Check if no deletion failed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut text = format!("Deleted {} file(s)", self.success_count());
        if !self.skipped.is_empty() {
            text.push_str(&format!(", {} already gone", self.skipped.len()));
        }
        if !self.all_succeeded() {
            text.push_str(&format!(", {} failed", self.failure_count()));
        }
        text
    }
}

#[cfg(windows)]
fn clear_readonly(path: &Path) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    if perms.readonly() {
        log::debug!("Clearing read-only attribute on {}", path.display());
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

#[cfg(not(windows))]
fn clear_readonly(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `Io` for any other failure
pub fn delete_file(path: &Path) -> Result<(), ActionError> {
    fs::symlink_metadata(path).map_err(|e| ActionError::from_io(path, e))?;

    if let Err(e) = clear_readonly(path) {
        log::debug!("Could not clear read-only on {}: {}", path.display(), e);
    }

    fs::remove_file(path).map_err(|e| ActionError::from_io(path, e))?;
    log::info!("Deleted: {}", path.display());
    Ok(())
}

/// Delete every path in `paths`.
///
/// Missing paths land in [`BatchDeleteResult::skipped`], never in
/// `errors`. One failure never stops the rest of the batch.
#[must_use]
pub fn delete_all(paths: &[PathBuf]) -> BatchDeleteResult {
    let mut result = BatchDeleteResult::default();

    for path in paths {
        match delete_file(path) {
            Ok(()) => result.deleted.push(path.clone()),
            Err(ActionError::NotFound(_)) => {
                log::warn!("Skipping {}: no longer exists", path.display());
                result.skipped.push(path.clone());
            }
            Err(e) => {
                log::warn!("Failed to delete {}: {}", path.display(), e);
                result.errors.push((path.clone(), e.to_string()));
            }
        }
    }

    log::info!("{}", result.summary());
    result
}
