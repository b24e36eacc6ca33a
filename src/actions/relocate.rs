//! Moving duplicate files into a destination directory.
//!
//! [`move_all`] moves every path to `destination/<file name>`. An existing
//! file at that spot is replaced without complaint; the last file moved
//! wins. Renames that cross a filesystem boundary fall back to copy and
//! remove.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::ActionError;

/// Results of a batch move.
#[derive(Debug, Clone, Default)]
pub struct BatchMoveResult {
    /// `(source, destination)` pairs that were moved.
    pub moved: Vec<(PathBuf, PathBuf)>,
    /// Failed moves with their messages.
    pub errors: Vec<(PathBuf, String)>,
}

impl BatchMoveResult {
    /// Number of successful moves.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.moved.len()
    }

    /// Number of failed moves.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.errors.len()
    }

    /// Check if no move failed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!("Moved {} file(s)", self.success_count())
        } else {
            format!(
                "Moved {} file(s), {} failed",
                self.success_count(),
                self.failure_count()
            )
        }
    }
}

fn is_cross_device_error(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::CrossesDevices
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn copy_then_remove(source: &Path, target: &Path) -> io::Result<()> {
    fs::copy(source, target)?;
    fs::File::open(target)?.sync_all()?;
    fs::remove_file(source)
}

/// Move one file into `destination`, which must already exist.
///
/// Returns the path the file now lives at.
///
/// # Errors
///
/// - `NotFound` if the source doesn't exist
/// - `NoFileName` if the source has no file name component
/// - `PermissionDenied` or `Io` if the replace or rename fails
pub fn move_file(source: &Path, destination: &Path) -> Result<PathBuf, ActionError> {
    fs::symlink_metadata(source).map_err(|e| ActionError::from_io(source, e))?;

    let name = source
        .file_name()
        .ok_or_else(|| ActionError::NoFileName(source.to_path_buf()))?;
    let target = destination.join(name);

    if same_file(source, &target) {
        log::debug!("{} is already in {}", source.display(), destination.display());
        return Ok(target);
    }

    if fs::symlink_metadata(&target).is_ok() {
        log::debug!("Replacing existing {}", target.display());
        fs::remove_file(&target).map_err(|e| ActionError::from_io(&target, e))?;
    }

    match fs::rename(source, &target) {
        Ok(()) => {}
        Err(e) if is_cross_device_error(&e) => {
            log::debug!(
                "Cross-device move of {}, copying instead",
                source.display()
            );
            copy_then_remove(source, &target).map_err(|e| ActionError::from_io(source, e))?;
        }
        Err(e) => return Err(ActionError::from_io(source, e)),
    }

    log::info!("Moved: {} -> {}", source.display(), target.display());
    Ok(target)
}

/// Move every path in `paths` into `destination`.
///
/// The destination directory is created first, with any missing parents.
/// If that fails, every path is reported as an error and nothing moves.
#[must_use]
pub fn move_all(paths: &[PathBuf], destination: &Path) -> BatchMoveResult {
    let mut result = BatchMoveResult::default();

    if let Err(e) = fs::create_dir_all(destination) {
        let err = ActionError::CreateDestination {
            path: destination.to_path_buf(),
            source: e,
        };
        log::warn!("{}", err);
        let message = err.to_string();
        result.errors = paths.iter().map(|p| (p.clone(), message.clone())).collect();
        return result;
    }

    for path in paths {
        match move_file(path, destination) {
            Ok(target) => result.moved.push((path.clone(), target)),
            Err(e) => {
                log::warn!("Failed to move {}: {}", path.display(), e);
                result.errors.push((path.clone(), e.to_string()));
            }
        }
    }

    log::info!("{}", result.summary());
    result
}
