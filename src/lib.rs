//! dupemgr - duplicate file finder and cleaner
//!
//! Files are duplicates when they share a base name, a size and a SHA-256
//! content digest. A scan walks a directory tree, buckets files by
//! `(name, size)`, hashes only the buckets with more than one member and
//! keeps the groups whose contents match. The oldest file of each group
//! can then be kept while the rest are deleted or moved.
//!
//! ```no_run
//! use dupemgr::actions::delete_all;
//! use dupemgr::duplicates::{plan_disposal, DuplicateScanner};
//! use std::path::Path;
//!
//! let (result, _summary) = DuplicateScanner::with_defaults().scan(Path::new(".")).unwrap();
//! let outcome = delete_all(&plan_disposal(&result));
//! println!("{}", outcome.summary());
//! ```

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use yansi::Paint;

use crate::actions::{delete_all, move_all};
use crate::cli::{Cli, Commands, OutputFormat, ScanAction, ScanArgs};
use crate::config::Config;
use crate::duplicates::{plan_disposal, CancelCheckpoints, DuplicateScanner, FinderConfig};
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, TextOutput};
use crate::progress::Progress;
use crate::scanner::WalkerConfig;

/// Run the command described by `cli`.
///
/// # Errors
///
/// Returns an error for invalid configuration, an unusable scan root or a
/// failure to write output. Per-file failures are reported through the
/// returned [`ExitCode`] instead.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    log::debug!("Effective configuration: {:?}", config);

    match cli.command {
        Commands::Scan(args) => run_scan(&args, &config, cli.quiet),
        Commands::Delete(args) => {
            let result = delete_all(&args.paths);
            report_batch(&result.summary(), &result.errors, cli.quiet)
        }
        Commands::Move(args) => {
            let result = move_all(&args.paths, &args.dest);
            report_batch(&result.summary(), &result.errors, cli.quiet)
        }
        Commands::Config => {
            let mut out = io::stdout().lock();
            match cli.config.clone().or_else(Config::default_path) {
                Some(path) => writeln!(out, "# {}", path.display())?,
                None => writeln!(out, "# no configuration directory")?,
            }
            write!(out, "{}", config.to_toml()?)?;
            Ok(ExitCode::Success)
        }
    }
}

/// Walker settings for a scan: configuration first, then command-line flags.
///
/// An allow-list given on the command line replaces the configured one and
/// restricts the scan to it unless `--include-others` is also passed.
#[must_use]
pub fn scan_walker_config(args: &ScanArgs, config: &Config) -> WalkerConfig {
    let mut walker = config.walker_config();

    if args.has_filters() {
        walker = walker
            .with_extensions(&args.extensions)
            .with_include_others(args.include_others);
        for category in &args.types {
            walker = walker.with_category(*category);
        }
    } else if args.include_others {
        walker = walker.with_include_others(true);
    }

    walker.excluded_dirs.extend(args.exclude.iter().cloned());
    walker
}

fn run_scan(args: &ScanArgs, config: &Config, quiet: bool) -> anyhow::Result<ExitCode> {
    let token = signal::install_handler().context("Failed to set up Ctrl+C handling")?;

    let checkpoints = if args.cancel_during_hashing {
        CancelCheckpoints::TraversalAndHashing
    } else {
        config.cancel_checkpoints
    };

    let mut finder_config = FinderConfig::default()
        .with_walker_config(scan_walker_config(args, config))
        .with_cancellation(token)
        .with_checkpoints(checkpoints);

    if config.progress && !args.no_progress && !quiet {
        finder_config = finder_config.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let (result, summary) = DuplicateScanner::new(finder_config)
        .scan(&args.path)
        .with_context(|| format!("Failed to scan {}", args.path.display()))?;

    let mut exit_code = if summary.cancelled {
        ExitCode::Interrupted
    } else if result.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    };

    let mut out = io::stdout().lock();
    match args.output {
        OutputFormat::Text => TextOutput::new(result.groups(), &summary).write_to(&mut out)?,
        OutputFormat::Json => {
            JsonOutput::new(result.groups(), &summary, exit_code).write_to(&mut out, true)?;
        }
        OutputFormat::Csv => CsvOutput::new(result.groups()).write_to(&mut out)?,
    }
    out.flush()?;
    drop(out);

    if exit_code != ExitCode::Success || args.action == ScanAction::None {
        return Ok(exit_code);
    }

    let plan = plan_disposal(&result);
    let batch = match (args.action, args.dest.as_deref()) {
        (ScanAction::Delete, _) => {
            let r = delete_all(&plan);
            Some((r.summary(), r.errors))
        }
        (ScanAction::Move, Some(dest)) => {
            let r = move_all(&plan, dest);
            Some((r.summary(), r.errors))
        }
        (ScanAction::Move, None) => anyhow::bail!("--action move needs --dest"),
        (ScanAction::None, _) => None,
    };

    if let Some((summary_line, errors)) = batch {
        exit_code = report_batch(&summary_line, &errors, quiet)?;
    }
    Ok(exit_code)
}

/// Print a batch summary and its failures to stderr.
fn report_batch(
    summary_line: &str,
    errors: &[(PathBuf, String)],
    quiet: bool,
) -> anyhow::Result<ExitCode> {
    let mut err = io::stderr().lock();
    if !quiet {
        writeln!(err, "{}", summary_line.bold())?;
    }
    for (path, message) in errors {
        writeln!(err, "  {} {}: {}", "failed".red(), path.display(), message)?;
    }

    Ok(if errors.is_empty() {
        ExitCode::Success
    } else {
        ExitCode::PartialSuccess
    })
}
