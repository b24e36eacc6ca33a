//! Keeper selection for duplicate groups.
//!
//! Every group keeps exactly one file, the *keeper*. The keeper is the file
//! with the earliest creation time; ties are broken by path. When the
//! platform cannot report a creation time for even one member, the whole
//! group is ordered by path instead.
//!
//! # Example
//!
//! ```
//! use dupemgr::duplicates::choose_original_by;
//! use std::path::PathBuf;
//! use std::time::{Duration, UNIX_EPOCH};
//!
//! let paths = vec![PathBuf::from("/b/x.txt"), PathBuf::from("/a/x.txt")];
//! let selection = choose_original_by(&paths, |p| {
//!     // /b is older
//!     let secs = if p.starts_with("/b") { 10 } else { 20 };
//!     Some(UNIX_EPOCH + Duration::from_secs(secs))
//! })
//! .unwrap();
//!
//! assert_eq!(selection.keeper, PathBuf::from("/b/x.txt"));
//! assert_eq!(selection.rest, vec![PathBuf::from("/a/x.txt")]);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::groups::ScanResult;

/// The keeper of a group and the files that may be disposed of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// File to retain
    pub keeper: PathBuf,
    /// Remaining files, in sorted order
    pub rest: Vec<PathBuf>,
}

impl Selection {
    /// Number of disposable files.
    #[must_use]
    pub fn disposable_count(&self) -> usize {
        self.rest.len()
    }
}

/// Errors from keeper selection.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SelectError {
    /// No paths were supplied.
    #[error("cannot choose an original from an empty group")]
    EmptyGroup,
}

/// Creation time of `path`, when the platform and filesystem report one.
#[must_use]
pub fn creation_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.created()).ok()
}

/// Choose the keeper among `paths` using on-disk creation times.
///
/// # Errors
///
/// Returns [`SelectError::EmptyGroup`] if `paths` is empty.
pub fn choose_original(paths: &[PathBuf]) -> Result<Selection, SelectError> {
    choose_original_by(paths, creation_time)
}

/// Choose the keeper among `paths` with a caller-supplied creation-time lookup.
///
/// The result does not depend on the order of `paths`.
///
/// # Errors
///
/// Returns [`SelectError::EmptyGroup`] if `paths` is empty.
pub fn choose_original_by<F>(paths: &[PathBuf], mut created: F) -> Result<Selection, SelectError>
where
    F: FnMut(&Path) -> Option<SystemTime>,
{
    if paths.is_empty() {
        return Err(SelectError::EmptyGroup);
    }

    let times: Option<Vec<SystemTime>> = paths.iter().map(|p| created(p.as_path())).collect();

    let mut ordered: Vec<PathBuf> = match times {
        Some(times) => {
            let mut keyed: Vec<(SystemTime, &PathBuf)> = times.into_iter().zip(paths).collect();
            keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.as_os_str().cmp(b.1.as_os_str())));
            keyed.into_iter().map(|(_, p)| p.clone()).collect()
        }
        None => {
            log::debug!("Creation time unavailable, ordering {} paths by name", paths.len());
            let mut sorted = paths.to_vec();
            sorted.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
            sorted
        }
    };

    let keeper = ordered.remove(0);
    Ok(Selection {
        keeper,
        rest: ordered,
    })
}

/// Every file that can go when each group keeps its original.
///
/// Groups are visited in result order; each contributes its non-keepers.
#[must_use]
pub fn plan_disposal(result: &ScanResult) -> Vec<PathBuf> {
    plan_disposal_by(result, creation_time)
}

/// [`plan_disposal`] with a caller-supplied creation-time lookup.
#[must_use]
pub fn plan_disposal_by<F>(result: &ScanResult, mut created: F) -> Vec<PathBuf>
where
    F: FnMut(&Path) -> Option<SystemTime>,
{
    let mut disposable = Vec::with_capacity(result.duplicate_files());
    for group in result {
        match choose_original_by(&group.paths(), &mut created) {
            Ok(selection) => {
                log::debug!(
                    "Keeping {} ({} copies to dispose)",
                    selection.keeper.display(),
                    selection.disposable_count()
                );
                disposable.extend(selection.rest);
            }
            Err(e) => log::warn!("Skipping group {}: {}", group.name(), e),
        }
    }
    disposable
}
