//! Command-line interface definitions for dupemgr.
//!
//! # Example
//!
//! ```bash
//! # List duplicate pictures, grouped
//! dupemgr scan ~/Pictures --type images
//!
//! # Machine-readable output
//! dupemgr scan ~/Downloads --output json
//!
//! # Keep the oldest copy of each group and delete the rest
//! dupemgr scan ~/Downloads --action delete
//!
//! # Act on an explicit selection
//! dupemgr move --dest ~/review ~/a/x.txt ~/b/x.txt
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::scanner::FileCategory;

/// Find duplicate files by name, size and content, and clean them up.
#[derive(Debug, Parser)]
#[command(name = "dupemgr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory for duplicate files
    Scan(ScanArgs),
    /// Permanently delete the given files
    Delete(DeleteArgs),
    /// Move the given files into a directory
    Move(MoveArgs),
    /// Print the effective configuration
    Config,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory path to scan for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Extension to include (e.g. `.jpg` or `jpg`), repeatable
    #[arg(short, long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// File type preset to include, repeatable
    #[arg(short = 't', long = "type", value_enum, value_name = "TYPE")]
    pub types: Vec<FileCategory>,

    /// Also keep files whose extension is not listed
    #[arg(long)]
    pub include_others: bool,

    /// Extra directory name to skip, repeatable
    #[arg(short = 'x', long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// What to do with every copy except the oldest in each group
    #[arg(short, long, value_enum, default_value = "none")]
    pub action: ScanAction,

    /// Destination directory for `--action move`
    #[arg(long, value_name = "DIR", required_if_eq("action", "move"))]
    pub dest: Option<PathBuf>,

    /// Also check for Ctrl+C between candidate groups while hashing
    #[arg(long)]
    pub cancel_during_hashing: bool,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl ScanArgs {
    /// Whether an allow-list was given on the command line.
    #[must_use]
    pub fn has_filters(&self) -> bool {
        !self.extensions.is_empty() || !self.types.is_empty()
    }
}

/// Arguments for the delete subcommand.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Files to delete
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

/// Arguments for the move subcommand.
#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Destination directory, created if missing
    #[arg(short, long, value_name = "DIR")]
    pub dest: PathBuf,

    /// Files to move
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable grouped listing
    Text,
    /// JSON for scripting
    Json,
    /// CSV for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Action applied to the disposal plan after a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScanAction {
    /// Report only
    None,
    /// Delete every copy except the keeper
    Delete,
    /// Move every copy except the keeper into `--dest`
    Move,
}
