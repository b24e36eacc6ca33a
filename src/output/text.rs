//! Human-readable listing of duplicate groups.
//!
//! ```text
//! Group 1: x.txt (5.00 B each, 2 files) 2cf24dba5fb0
//!   /root/a/x.txt
//!   /root/b/x.txt
//!
//! 1 duplicate group(s), 1 removable file(s), 5.00 B reclaimable
//! ```
//!
//! Colors come from `yansi` and follow its global switch.

use std::io::{self, Write};

use yansi::Paint;

use crate::duplicates::{format_size, DuplicateGroup, ScanSummary};

/// Length of the hash prefix shown per group.
const SHORT_HASH_LEN: usize = 12;

/// Grouped text formatter.
pub struct TextOutput<'a> {
    groups: &'a [DuplicateGroup],
    summary: &'a ScanSummary,
}

impl<'a> TextOutput<'a> {
    /// Create a new text formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup], summary: &'a ScanSummary) -> Self {
        Self { groups, summary }
    }

    /// Write every group followed by a summary line.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.summary.cancelled {
            writeln!(writer, "{}", "Scan cancelled, no results.".yellow())?;
            return Ok(());
        }

        if self.groups.is_empty() {
            writeln!(writer, "{}", "No duplicates found.".green())?;
            return Ok(());
        }

        for (idx, group) in self.groups.iter().enumerate() {
            let hash = group.hash_hex();
            writeln!(
                writer,
                "{} {} ({} each, {} files) {}",
                format!("Group {}:", idx + 1).bold(),
                group.name().cyan(),
                format_size(group.size()),
                group.len(),
                hash[..SHORT_HASH_LEN].dim()
            )?;
            for file in &group.files {
                writeln!(writer, "  {}", file.path.display())?;
            }
            writeln!(writer)?;
        }

        writeln!(
            writer,
            "{} duplicate group(s), {} removable file(s), {} reclaimable",
            self.summary.duplicate_groups,
            self.summary.duplicate_files,
            self.summary.reclaimable_display().bold()
        )?;

        if self.summary.failed_files > 0 {
            writeln!(
                writer,
                "{}",
                format!("{} file(s) could not be read", self.summary.failed_files).yellow()
            )?;
        }
        Ok(())
    }
}
