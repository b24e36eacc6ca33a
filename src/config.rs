//! Layered application configuration.
//!
//! Settings are merged from, lowest to highest priority:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`<config dir>/dupemgr/config.toml`, or `--config PATH`)
//! 3. `DUPEMGR_*` environment variables (`__` separates nested keys)
//! 4. Command-line flags, applied by the caller after loading
//!
//! ```toml
//! excluded_dirs = ["$RECYCLE.BIN", "System Volume Information", "Lib", "node_modules"]
//! extensions = [".jpg", ".png"]
//! include_others = false
//! cancel_checkpoints = "traversal-and-hashing"
//! progress = true
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duplicates::CancelCheckpoints;
use crate::scanner::{WalkerConfig, DEFAULT_EXCLUDED_DIRS};

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "DUPEMGR_";

/// Errors from loading or rendering configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source held a value of the wrong shape, or the file is not TOML.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// The effective configuration could not be rendered as TOML.
    #[error("cannot render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Invalid(Box::new(err))
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory names never descended into (dot-directories always are).
    pub excluded_dirs: Vec<String>,
    /// Extension allow-list. Empty means every extension.
    pub extensions: Vec<String>,
    /// Keep files outside the allow-list.
    pub include_others: bool,
    /// Where a scan polls for cancellation.
    pub cancel_checkpoints: CancelCheckpoints,
    /// Draw progress on stderr.
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| (*d).to_string()).collect(),
            extensions: Vec::new(),
            include_others: true,
            cancel_checkpoints: CancelCheckpoints::default(),
            progress: true,
        }
    }
}

impl Config {
    /// Platform config file location, when a home directory is known.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupemgr").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Build the figment for defaults, the file at `path` and the environment.
    ///
    /// A file that does not exist contributes nothing.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration from `path`, or the platform default when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the file or an environment
    /// variable cannot be parsed into the expected shape.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = path.map(Path::to_path_buf).or_else(Self::default_path);

        match resolved.as_deref() {
            Some(p) if p.exists() => log::debug!("Loading configuration from {}", p.display()),
            Some(p) if path.is_some() => {
                log::warn!("Config file {} not found, using defaults", p.display());
            }
            _ => log::trace!("No configuration file"),
        }

        let config: Self = Self::figment(resolved.as_deref()).extract()?;
        Ok(config)
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(&self.extensions, self.include_others)
            .with_excluded_dirs(self.excluded_dirs.iter().cloned())
    }

    /// Render the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Render`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
