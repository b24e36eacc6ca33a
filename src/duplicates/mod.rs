//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Content hashing of `(name, size)` candidates and re-bucketing by digest
//! - Duplicate group and result management
//! - Keeper selection and disposal planning

pub mod finder;
pub mod groups;
pub mod original;

pub use finder::{
    format_size, hash_candidates, scan_for_duplicates, CancelCheckpoints, DuplicateScanner,
    FinderConfig, FinderError, HashStats, ScanSummary,
};
pub use groups::{DuplicateGroup, DuplicateKey, ScanResult};
pub use original::{
    choose_original, choose_original_by, creation_time, plan_disposal, plan_disposal_by,
    SelectError, Selection,
};
