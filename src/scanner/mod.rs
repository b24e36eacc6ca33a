//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Sequential directory walking with exclusion and extension filters
//! - Streaming SHA-256 content hashing
//! - Bucketing of files by their cheap `(name, size)` signature
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and candidate bucketing
//! - [`hasher`]: SHA-256 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dupemgr::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig::default().with_extensions([".txt"]);
//! let walker = Walker::new(Path::new("."), config);
//! let outcome = walker.group_candidates();
//! for group in &outcome.groups {
//!     println!("{} files named {}", group.len(), group.key.name);
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

// Re-export main types
pub use hasher::{hash_to_hex, Hash, Hasher, CHUNK_SIZE};
pub use walker::{CandidateGroup, WalkOutcome, Walker};

/// Directory names that are never descended into.
pub const DEFAULT_EXCLUDED_DIRS: [&str; 3] = ["$RECYCLE.BIN", "System Volume Information", "Lib"];

/// Metadata for a discovered file.
///
/// Records are derived fresh on every scan and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path to the file as discovered under the scan root
    pub path: PathBuf,
    /// Base name of the file
    pub name: String,
    /// File size in bytes
    pub size: u64,
    /// Creation time, when the platform and filesystem report one
    pub created: Option<SystemTime>,
}

impl FileRecord {
    /// Create a new FileRecord.
    ///
    /// The name is taken from the last component of `path`.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, created: Option<SystemTime>) -> Self {
        let name = file_name_of(&path);
        Self {
            path,
            name,
            size,
            created,
        }
    }

    /// The cheap signature used to bucket this file before hashing.
    #[must_use]
    pub fn candidate_key(&self) -> CandidateKey {
        CandidateKey {
            name: self.name.clone(),
            size: self.size,
        }
    }
}

/// Cheap equality signature: base name and size.
///
/// Two files with different keys can never be duplicates. Sharing a key
/// only means the pair is worth hashing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateKey {
    /// Base name of the file
    pub name: String,
    /// File size in bytes
    pub size: u64,
}

/// Lossy base name of a path, or an empty string for paths without one.
#[must_use]
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lower-cased extension of a path including its leading dot (`".txt"`).
///
/// Returns an empty string when the file has no extension. Dot-files such
/// as `.bashrc` have no extension.
#[must_use]
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Normalize a user-supplied extension to the `".ext"` lower-case form.
#[must_use]
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

/// File type presets offered to callers for building an allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// Common raster image formats
    Images,
    /// Common video containers
    Videos,
    /// Office documents, PDFs and plain text
    Documents,
}

impl FileCategory {
    /// Extensions belonging to this category, lower-cased with leading dot.
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Images => &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp"],
            Self::Videos => &[".mp4", ".avi", ".mkv", ".mov", ".wmv"],
            Self::Documents => &[
                ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".txt",
            ],
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Images => write!(f, "images"),
            Self::Videos => write!(f, "videos"),
            Self::Documents => write!(f, "documents"),
        }
    }
}

/// Configuration for directory walking.
///
/// Controls which directories are pruned and which files are bucketed.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Allowed extensions, lower-cased with leading dot.
    /// Empty means no restriction.
    pub extensions: BTreeSet<String>,

    /// Keep files outside the allow-list anyway.
    pub include_others: bool,

    /// Directory names that are never descended into (case-sensitive).
    pub excluded_dirs: BTreeSet<String>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            extensions: BTreeSet::new(),
            include_others: true,
            excluded_dirs: DEFAULT_EXCLUDED_DIRS
                .iter()
                .map(|d| (*d).to_string())
                .collect(),
        }
    }
}

impl WalkerConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    ///
    /// * `extensions` - Allowed extensions (with or without leading dot)
    /// * `include_others` - Whether to keep files outside the allow-list
    #[must_use]
    pub fn new<I, S>(extensions: I, include_others: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::default()
            .with_extensions(extensions)
            .with_include_others(include_others)
    }

    /// Replace the extension allow-list.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// Add every extension of a preset to the allow-list.
    #[must_use]
    pub fn with_category(mut self, category: FileCategory) -> Self {
        self.extensions
            .extend(category.extensions().iter().map(|e| (*e).to_string()));
        self
    }

    /// Set whether files outside the allow-list are kept.
    #[must_use]
    pub fn with_include_others(mut self, include_others: bool) -> Self {
        self.include_others = include_others;
        self
    }

    /// Replace the set of excluded directory names.
    #[must_use]
    pub fn with_excluded_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a directory with this name is pruned from the walk.
    #[must_use]
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        name.starts_with('.') || self.excluded_dirs.contains(name)
    }

    /// Whether a file with this path passes the extension filter.
    #[must_use]
    pub fn accepts_file(&self, path: &Path) -> bool {
        if self.extensions.is_empty() || self.include_others {
            return true;
        }
        self.extensions.contains(&extension_of(path))
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A candidate file could not be hashed.
    #[error(transparent)]
    HashError(#[from] HashError),
}

impl ScanError {
    /// Classify an I/O error raised while touching `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path of the file that failed to hash.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}
