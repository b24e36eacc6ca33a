//! Duplicate keys, groups and the per-scan result map.
//!
//! # Overview
//!
//! A [`DuplicateGroup`] holds files that share a [`DuplicateKey`]: the same
//! SHA-256 content digest, the same base name and the same size. Name is
//! part of the key, so identical content stored under different names is
//! *not* grouped.
//!
//! [`ScanResult`] is the mapping from key to group for one scan. It keeps
//! groups in discovery order and supports lookup by key.
//!
//! # Example
//!
//! ```
//! use dupemgr::duplicates::{DuplicateGroup, DuplicateKey, ScanResult};
//! use dupemgr::scanner::FileRecord;
//! use std::path::PathBuf;
//!
//! let key = DuplicateKey::new([0u8; 32], "x.txt", 5);
//! let group = DuplicateGroup::new(
//!     key.clone(),
//!     vec![
//!         FileRecord::new(PathBuf::from("/a/x.txt"), 5, None),
//!         FileRecord::new(PathBuf::from("/b/x.txt"), 5, None),
//!     ],
//! );
//!
//! let result = ScanResult::from_groups(vec![group]);
//! assert_eq!(result.len(), 1);
//! assert_eq!(result.get(&key).unwrap().len(), 2);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::{hash_to_hex, FileRecord, Hash};

/// The true grouping key: content digest, base name and size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey {
    /// SHA-256 digest of the full content
    pub hash: Hash,
    /// Base name shared by every file in the group
    pub name: String,
    /// Size in bytes shared by every file in the group
    pub size: u64,
}

impl DuplicateKey {
    /// Create a new key.
    #[must_use]
    pub fn new(hash: Hash, name: impl Into<String>, size: u64) -> Self {
        Self {
            hash,
            name: name.into(),
            size,
        }
    }

    /// Digest as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }
}

/// Confirmed duplicate group of files, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Key shared by every member
    pub key: DuplicateKey,
    /// Members in the order the traversal found them
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(key: DuplicateKey, files: Vec<FileRecord>) -> Self {
        Self { key, files }
    }

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

    /// Shared file size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.key.size
    }

    /// Shared base name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.key.size * self.files.len() as u64
    }

    /// Space freed by keeping one copy and removing the rest.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.key.size * self.duplicate_count() as u64
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Digest as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        self.key.hash_hex()
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Duplicate groups found by one scan, keyed by [`DuplicateKey`].
///
/// Iteration follows discovery order. Once returned, the result is owned
/// entirely by the caller.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    groups: Vec<DuplicateGroup>,
    index: HashMap<DuplicateKey, usize>,
}

impl ScanResult {
    /// Create an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a result from groups. Groups sharing a key are merged.
    #[must_use]
    pub fn from_groups(groups: impl IntoIterator<Item = DuplicateGroup>) -> Self {
        let mut result = Self::new();
        for group in groups {
            result.push_group(group);
        }
        result
    }

    pub(crate) fn push_group(&mut self, group: DuplicateGroup) {
        match self.index.get(&group.key) {
            Some(&slot) => self.groups[slot].files.extend(group.files),
            None => {
                self.index.insert(group.key.clone(), self.groups.len());
                self.groups.push(group);
            }
        }
    }

    /// Number of duplicate groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Look up the group for a key.
    #[must_use]
    pub fn get(&self, key: &DuplicateKey) -> Option<&DuplicateGroup> {
        self.index.get(key).map(|&slot| &self.groups[slot])
    }

    /// Whether a group exists for this key.
    #[must_use]
    pub fn contains_key(&self, key: &DuplicateKey) -> bool {
        self.index.contains_key(key)
    }

    /// Groups in discovery order.
    #[must_use]
    pub fn groups(&self) -> &[DuplicateGroup] {
        &self.groups
    }

    /// Iterate over groups in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, DuplicateGroup> {
        self.groups.iter()
    }

    /// Iterate over keys in discovery order.
    pub fn keys(&self) -> impl Iterator<Item = &DuplicateKey> {
        self.groups.iter().map(|g| &g.key)
    }

    /// Consume the result, returning its groups.
    #[must_use]
    pub fn into_groups(self) -> Vec<DuplicateGroup> {
        self.groups
    }

    /// Number of removable copies across all groups.
    #[must_use]
    pub fn duplicate_files(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::duplicate_count).sum()
    }

    /// Bytes freed by keeping one copy per group.
    #[must_use]
    pub fn reclaimable_space(&self) -> u64 {
        self.groups.iter().map(DuplicateGroup::wasted_space).sum()
    }
}

impl IntoIterator for ScanResult {
    type Item = DuplicateGroup;
    type IntoIter = std::vec::IntoIter<DuplicateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'a> IntoIterator for &'a ScanResult {
    type Item = &'a DuplicateGroup;
    type IntoIter = std::slice::Iter<'a, DuplicateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
