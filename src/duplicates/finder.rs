//! Duplicate scanner orchestrating the walk and the hashing phase.
//!
//! # Overview
//!
//! This module runs the duplicate detection pipeline on a single thread:
//! 1. **Walk** - traverse the tree and bucket files by `(name, size)`
//!    (see [`crate::scanner::walker`])
//! 2. **Hash** - stream every member of every candidate bucket through
//!    SHA-256 and re-bucket by `(hash, name, size)`
//! 3. **Filter** - drop any bucket that collapsed to a single file
//!
//! Per-file failures (vanished, unreadable) exclude that file and are
//! recorded in the [`ScanSummary`]; they never abort the scan.
//!
//! # Example
//!
//! ```no_run
//! use dupemgr::duplicates::{DuplicateScanner, FinderConfig};
//! use dupemgr::scanner::WalkerConfig;
//! use std::path::Path;
//!
//! let config = FinderConfig::default()
//!     .with_walker_config(WalkerConfig::new([".txt"], false));
//! let scanner = DuplicateScanner::new(config);
//!
//! let (result, summary) = scanner.scan(Path::new("/some/path")).unwrap();
//! println!("{} groups, {} reclaimable", result.len(), summary.reclaimable_display());
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::groups::{DuplicateGroup, DuplicateKey, ScanResult};
use crate::progress::{Phase, ProgressCallback, ProgressEvent};
use crate::scanner::{CandidateGroup, Hasher, ScanError, Walker, WalkerConfig};
use crate::signal::CancellationToken;

/// Where the scanner polls the cancellation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CancelCheckpoints {
    /// Before each directory visit only. Hashing runs to completion.
    #[default]
    Traversal,
    /// Before each directory visit and before each candidate group is hashed.
    TraversalAndHashing,
}

impl CancelCheckpoints {
    fn during_hashing(self) -> bool {
        matches!(self, Self::TraversalAndHashing)
    }
}

/// Configuration for the duplicate scanner.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional cancellation token.
    pub cancellation: Option<CancellationToken>,
    /// Where the token is polled.
    pub checkpoints: CancelCheckpoints,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("cancellation", &self.cancellation)
            .field("checkpoints", &self.checkpoints)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Set where the cancellation token is polled.
    #[must_use]
    pub fn with_checkpoints(mut self, checkpoints: CancelCheckpoints) -> Self {
        self.checkpoints = checkpoints;
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
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Files that passed the filters during the walk
    pub total_files: usize,
    /// Directories visited
    pub dirs_visited: usize,
    /// Candidate groups sharing `(name, size)`
    pub candidate_groups: usize,
    /// Files in candidate groups
    pub candidate_files: usize,
    /// Files hashed successfully
    pub hashed_files: usize,
    /// Files that could not be hashed and were excluded
    pub failed_files: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding one keeper per group)
    pub duplicate_files: usize,
    /// Space freed by keeping one copy per group
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Whether the scan was cancelled (result is then empty)
    pub cancelled: bool,
    /// Non-fatal errors encountered during the scan
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        format_size(self.reclaimable_space)
    }
}

/// Statistics from the hashing phase.
#[derive(Debug, Default)]
pub struct HashStats {
    /// Candidate groups processed
    pub groups_processed: usize,
    /// Files hashed successfully
    pub hashed_files: usize,
    /// Errors for files that could not be hashed
    pub errors: Vec<ScanError>,
    /// Whether hashing stopped at a cancellation checkpoint
    pub cancelled: bool,
}

/// Format a byte size as a human-readable string (1024-based units).
///
/// # Example
///
/// ```
/// use dupemgr::duplicates::format_size;
///
/// assert_eq!(format_size(512), "512.00 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Errors that can occur during duplicate finding.
///
/// Only invalid input is reported here. Per-file problems end up in
/// [`ScanSummary::scan_errors`], and cancellation yields an empty result.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Hash every member of every candidate group and keep confirmed duplicates.
///
/// Groups are processed in order; after each one a
/// `Hashed i/N groups` event is sent to the callback. Files that fail to
/// hash are excluded and reported in [`HashStats::errors`].
///
/// When `config.checkpoints` includes hashing and cancellation is observed
/// before a group, the returned result is empty and `cancelled` is set.
#[must_use]
pub fn hash_candidates(
    candidates: Vec<CandidateGroup>,
    hasher: &Hasher,
    config: &FinderConfig,
) -> (ScanResult, HashStats) {
    let mut result = ScanResult::new();
    let mut stats = HashStats::default();
    let total = candidates.len();

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start(Phase::Hashing, total);
    }

    log::info!("Hashing {} candidate groups", total);

    for (i, candidate) in candidates.into_iter().enumerate() {
        if config.checkpoints.during_hashing() && config.is_cancelled() {
            log::info!("Hashing cancelled after {}/{} groups", i, total);
            stats.cancelled = true;
            result = ScanResult::new();
            break;
        }

        let mut order: Vec<DuplicateKey> = Vec::new();
        let mut buckets: HashMap<DuplicateKey, Vec<_>> = HashMap::new();

        for file in candidate.files {
            match hasher.hash_file(&file.path) {
                Ok(hash) => {
                    stats.hashed_files += 1;
                    log::trace!("Hashed {}", file.path.display());
                    let key = DuplicateKey::new(hash, file.name.clone(), file.size);
                    let bucket = buckets.entry(key.clone()).or_insert_with(|| {
                        order.push(key);
                        Vec::new()
                    });
                    bucket.push(file);
                }
                Err(e) => {
                    log::warn!("Failed to hash {}: {}", file.path.display(), e);
                    stats.errors.push(ScanError::from(e));
                }
            }
        }

        for key in order {
            if let Some(files) = buckets.remove(&key) {
                if files.len() > 1 {
                    result.push_group(DuplicateGroup::new(key, files));
                } else {
                    log::trace!("Content differs for {} ({} bytes)", key.name, key.size);
                }
            }
        }

        stats.groups_processed = i + 1;
        if let Some(ref callback) = config.progress_callback {
            callback.on_progress(&ProgressEvent::hashing(i + 1, total));
        }
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end(Phase::Hashing);
    }

    (result, stats)
}

/// Duplicate scanner that orchestrates the walk and hashing phases.
///
/// # Example
///
/// ```no_run
/// use dupemgr::duplicates::DuplicateScanner;
/// use std::path::Path;
///
/// let scanner = DuplicateScanner::with_defaults();
/// match scanner.scan(Path::new(".")) {
///     Ok((result, summary)) => {
///         println!("Found {} duplicate groups", result.len());
///         println!("Can reclaim {} bytes", summary.reclaimable_space);
///     }
///     Err(e) => eprintln!("Scan failed: {}", e),
/// }
/// ```
pub struct DuplicateScanner {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateScanner {
    /// Create a new scanner with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a new scanner with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The configuration this scanner runs with.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Find all duplicate groups under `root`.
    ///
    /// # Returns
    ///
    /// A tuple of:
    /// - [`ScanResult`] - Confirmed duplicate groups (empty when cancelled)
    /// - [`ScanSummary`] - Statistics about the scan
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the root does not exist or is not a
    /// directory. Nothing that happens during the scan is an error.
    pub fn scan(&self, root: &Path) -> Result<(ScanResult, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();

        if !root.exists() {
            return Err(FinderError::PathNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(FinderError::NotADirectory(root.to_path_buf()));
        }

        log::info!("Starting duplicate scan of {}", root.display());

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(Phase::Walking, 0);
        }

        let mut walker = Walker::new(root, self.config.walker_config.clone());
        if let Some(ref token) = self.config.cancellation {
            walker = walker.with_cancellation(token.clone());
        }
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(callback.clone());
        }

        let mut outcome = walker.group_candidates();

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(Phase::Walking);
        }

        summary.total_files = outcome.files_seen;
        summary.dirs_visited = outcome.dirs_visited;
        summary.scan_errors = std::mem::take(&mut outcome.errors);

        if outcome.cancelled {
            log::info!("Scan cancelled during traversal, no files hashed");
            summary.cancelled = true;
            summary.scan_duration = start_time.elapsed();
            return Ok((ScanResult::new(), summary));
        }

        summary.candidate_groups = outcome.groups.len();
        summary.candidate_files = outcome.candidate_files();

        let (result, stats) = hash_candidates(outcome.groups, &self.hasher, &self.config);

        summary.hashed_files = stats.hashed_files;
        summary.failed_files = stats.errors.len();
        summary.scan_errors.extend(stats.errors);
        summary.scan_duration = start_time.elapsed();

        if stats.cancelled {
            summary.cancelled = true;
            return Ok((ScanResult::new(), summary));
        }

        summary.duplicate_groups = result.len();
        summary.duplicate_files = result.duplicate_files();
        summary.reclaimable_space = result.reclaimable_space();

        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display()
        );

        Ok((result, summary))
    }
}

/// One-call scan: filters, optional progress observer and a cancellation token.
///
/// Equivalent to building a [`DuplicateScanner`] with traversal-only
/// checkpoints and discarding the summary.
///
/// # Errors
///
/// Returns [`FinderError`] if `root` is missing or not a directory.
pub fn scan_for_duplicates<S: AsRef<str>>(
    root: &Path,
    allowed_extensions: &[S],
    include_others: bool,
    progress: Option<Arc<dyn ProgressCallback>>,
    cancellation: &CancellationToken,
) -> Result<ScanResult, FinderError> {
    let mut config = FinderConfig::default()
        .with_walker_config(WalkerConfig::new(allowed_extensions, include_others))
        .with_cancellation(cancellation.clone());
    if let Some(callback) = progress {
        config = config.with_progress_callback(callback);
    }
    DuplicateScanner::new(config).scan(root).map(|(result, _)| result)
}
