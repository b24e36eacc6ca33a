//! CSV output formatter for duplicate scan results.
//!
//! One row is generated for each file in each duplicate group.
//!
//! # Columns
//!
//! - `group_id`: 1-based index of the duplicate group
//! - `hash`: SHA-256 content hash (hexadecimal)
//! - `name`: Shared base name
//! - `size`: File size in bytes
//! - `path`: Absolute path to the file
//!
//! # Example
//!
//! ```no_run
//! use dupemgr::duplicates::DuplicateScanner;
//! use dupemgr::output::csv::CsvOutput;
//! use std::path::Path;
//!
//! let (result, _) = DuplicateScanner::with_defaults().scan(Path::new(".")).unwrap();
//! CsvOutput::new(result.groups()).write_to(std::io::stdout()).unwrap();
//! ```

use std::io;

use serde::Serialize;
use thiserror::Error;

use super::json::normalize_path;
use crate::duplicates::DuplicateGroup;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Output was not valid UTF-8.
    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: usize,
    hash: &'a str,
    name: &'a str,
    size: u64,
    path: String,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    groups: &'a [DuplicateGroup],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self { groups }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (idx, group) in self.groups.iter().enumerate() {
            let hash_hex = group.hash_hex();

            for file in &group.files {
                csv_writer.serialize(CsvRow {
                    group_id: idx + 1,
                    hash: &hash_hex,
                    name: group.name(),
                    size: group.size(),
                    path: normalize_path(&file.path),
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_csv_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
