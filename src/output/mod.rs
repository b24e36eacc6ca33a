//! Output formatters for duplicate scan results.
//!
//! This module provides the output formats for scan results:
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//! - Grouped, colored text for people
//!
//! # Example
//!
//! ```no_run
//! use dupemgr::duplicates::DuplicateScanner;
//! use dupemgr::error::ExitCode;
//! use dupemgr::output::json::JsonOutput;
//! use std::path::Path;
//!
//! let (result, summary) = DuplicateScanner::with_defaults().scan(Path::new(".")).unwrap();
//!
//! let output = JsonOutput::new(result.groups(), &summary, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

pub use csv::CsvOutput;
pub use json::JsonOutput;
pub use text::TextOutput;
