//! Directory walker that buckets files into duplicate candidates.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and grouping its files by their cheap `(name, size)` signature.
//! Only buckets with two or more members survive, so singletons never
//! reach the hashing phase.
//!
//! # Features
//!
//! - Sequential, deterministic traversal using [`walkdir`] (children sorted by name)
//! - Pruning of excluded and hidden (dot-prefixed) directories
//! - Extension allow-list with an "include others" escape hatch
//! - Cooperative cancellation polled before every directory visit
//! - Per-file metadata failures are skipped, never fatal
//!
//! # Example
//!
//! ```no_run
//! use dupemgr::scanner::{Walker, WalkerConfig};
//! use dupemgr::signal::CancellationToken;
//! use std::path::Path;
//!
//! let token = CancellationToken::new();
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default())
//!     .with_cancellation(token.clone());
//!
//! let outcome = walker.group_candidates();
//! println!("{} candidate groups", outcome.groups.len());
//! ```

use std::collections::HashMap;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use super::{CandidateKey, FileRecord, ScanError, WalkerConfig};
use crate::progress::{ProgressCallback, ProgressEvent};
use crate::signal::CancellationToken;

/// Files sharing a [`CandidateKey`], in discovery order.
#[derive(Debug, Clone)]
pub struct CandidateGroup {
    /// Shared name and size
    pub key: CandidateKey,
    /// Files with this signature
    pub files: Vec<FileRecord>,
}

impl CandidateGroup {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths of the files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Result of one traversal.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Candidate groups with 2+ files, in order of first discovery
    pub groups: Vec<CandidateGroup>,
    /// Files that passed the filters and could be stat'ed
    pub files_seen: usize,
    /// Directories visited (root included)
    pub dirs_visited: usize,
    /// Whether the walk was abandoned because cancellation was requested
    pub cancelled: bool,
    /// Non-fatal errors encountered along the way
    pub errors: Vec<ScanError>,
}

impl WalkOutcome {
    fn cancelled(dirs_visited: usize) -> Self {
        Self {
            dirs_visited,
            cancelled: true,
            ..Self::default()
        }
    }

    /// Total number of files across all candidate groups.
    #[must_use]
    pub fn candidate_files(&self) -> usize {
        self.groups.iter().map(CandidateGroup::len).sum()
    }
}

/// Directory walker for candidate discovery.
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional cancellation token polled before each directory
    cancellation: Option<CancellationToken>,
    /// Optional observer notified once per directory
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("cancellation", &self.cancellation)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            cancellation: None,
            progress_callback: None,
        }
    }

    /// Set the cancellation token.
    ///
    /// The token is polled before descending into each directory; once it
    /// reports cancellation the walk stops and yields no groups at all.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Whether the walk should descend into / keep this entry.
    fn keep_entry(&self, entry: &DirEntry) -> bool {
        // The root is never pruned, even if its own name looks hidden.
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if self.config.is_excluded_dir(&name) {
            log::trace!("Pruning directory: {}", entry.path().display());
            return false;
        }
        true
    }

    /// Walk the tree and bucket surviving files by `(name, size)`.
    ///
    /// Returns only buckets with two or more members. If cancellation is
    /// observed at any directory boundary, the returned outcome has no
    /// groups and `cancelled` set.
    #[must_use]
    pub fn group_candidates(&self) -> WalkOutcome {
        let mut index: HashMap<CandidateKey, usize> = HashMap::new();
        let mut buckets: Vec<CandidateGroup> = Vec::new();
        let mut outcome = WalkOutcome::default();

        let walk = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.keep_entry(e));

        for entry_result in walk {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), Path::to_path_buf);
                    log::warn!("Walker error for {}: {}", path.display(), e);
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                    outcome.errors.push(ScanError::from_io(&path, source));
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                if self.is_cancelled() {
                    log::info!(
                        "Walker: cancellation requested after {} directories, discarding results",
                        outcome.dirs_visited
                    );
                    return WalkOutcome::cancelled(outcome.dirs_visited);
                }
                outcome.dirs_visited += 1;
                if let Some(ref callback) = self.progress_callback {
                    callback.on_progress(&ProgressEvent::walking(outcome.dirs_visited));
                }
                continue;
            }

            if !self.config.accepts_file(entry.path()) {
                log::trace!("Skipping file due to extension filter: {}", entry.path().display());
                continue;
            }

            let Some(metadata) = self.file_metadata(&entry) else {
                continue;
            };

            let record = FileRecord::new(
                entry.path().to_path_buf(),
                metadata.len(),
                metadata.created().ok(),
            );
            outcome.files_seen += 1;

            let key = record.candidate_key();
            match index.get(&key) {
                Some(&slot) => buckets[slot].files.push(record),
                None => {
                    index.insert(key.clone(), buckets.len());
                    buckets.push(CandidateGroup {
                        key,
                        files: vec![record],
                    });
                }
            }
        }

        let total = buckets.len();
        outcome.groups = buckets.into_iter().filter(|g| g.len() > 1).collect();

        log::info!(
            "Walk complete: {} files in {} directories, {} signatures, {} candidate groups",
            outcome.files_seen,
            outcome.dirs_visited,
            total,
            outcome.groups.len()
        );

        outcome
    }

    /// Stat a non-directory entry without following it.
    ///
    /// Returns `None` for symlinks and for anything that is not a regular
    /// file or cannot be stat'ed; those entries are dropped from the scan.
    fn file_metadata(&self, entry: &DirEntry) -> Option<Metadata> {
        if entry.path_is_symlink() {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }

        let metadata = entry.metadata().map_err(|e| {
            e.into_io_error()
                .unwrap_or_else(|| std::io::Error::other("metadata unavailable"))
        });

        match metadata {
            Ok(m) if m.is_file() => Some(m),
            Ok(_) => None,
            Err(e) => {
                log::debug!("Skipping unreadable file {}: {}", entry.path().display(), e);
                None
            }
        }
    }
}
