//! Bulk file operations on a list of paths.
//!
//! This module provides functionality for:
//! - Permanent deletion of every path in a batch
//! - Moving every path in a batch into one destination directory
//!
//! Each path is handled independently: a failure is recorded as
//! `(path, message)` and the batch continues. Neither operation returns
//! `Err`.
//!
//! ```no_run
//! use dupemgr::actions::{delete_all, move_all};
//! use std::path::{Path, PathBuf};
//!
//! let removed = delete_all(&[PathBuf::from("/tmp/dup1.txt")]);
//! println!("{}", removed.summary());
//!
//! let moved = move_all(&[PathBuf::from("/tmp/dup2.txt")], Path::new("/tmp/review"));
//! println!("{}", moved.summary());
//! ```

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod delete;
pub mod relocate;

pub use delete::{delete_all, delete_file, BatchDeleteResult};
pub use relocate::{move_all, move_file, BatchMoveResult};

/// Error for a single file operation.
#[derive(Debug, Error)]
pub enum ActionError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied for the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The destination directory could not be created.
    #[error("cannot create destination {path}: {source}")]
    CreateDestination {
        /// Destination directory
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Path has no file name component to move under the destination.
    #[error("no file name in path: {0}")]
    NoFileName(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ActionError {
    /// Classify an I/O error raised while operating on `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::NoFileName(p)
            | Self::CreateDestination { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }
}
