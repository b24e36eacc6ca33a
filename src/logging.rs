//! Logging setup for dupemgr.
//!
//! The library only talks to the `log` facade. The binary installs an
//! `env_logger` backend once at startup; the level is chosen by, in order:
//!
//! 1. `RUST_LOG`, when set
//! 2. `--quiet` (errors only), else `-v` (debug) / `-vv` (trace)
//! 3. info
//!
//! Debug builds stamp each line with the time, and with the module path
//! when verbose. Release builds print `LEVEL message`.
//!
//! ```rust,no_run
//! use dupemgr::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("visible at -v");
//! ```

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Install the global logger.
///
/// Calling this a second time leaves the first logger in place and records
/// a debug line instead of panicking.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    let from_env = env::var_os("RUST_LOG").is_some();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        log::debug!("Logger already installed");
        return;
    }

    if from_env {
        log::debug!("Log filter taken from RUST_LOG");
    } else {
        log::debug!("Log level: {}", determine_level(verbose, quiet));
    }
}

/// Level for the given `-v` count and `--quiet` flag. Quiet wins.
#[must_use]
pub fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

#[cfg(debug_assertions)]
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let style = buf.default_level_style(record.level());
        let stamp = buf.timestamp_seconds();
        if verbose > 0 {
            writeln!(
                buf,
                "{stamp} {style}{:<5}{style:#} [{}] {}",
                record.level(),
                record.module_path().unwrap_or("?"),
                record.args()
            )
        } else {
            writeln!(buf, "{stamp} {style}{:<5}{style:#} {}", record.level(), record.args())
        }
    });
}

#[cfg(not(debug_assertions))]
fn configure_format(builder: &mut Builder, _verbose: u8) {
    builder.format(|buf, record| {
        let style = buf.default_level_style(record.level());
        writeln!(buf, "{style}{:<5}{style:#} {}", record.level(), record.args())
    });
}
