//! Configuration loading and root folder resolution
//!
//! Root folder priority:
//! 1. Command-line argument (highest priority)
//! 2. `NLDT_ROOT` environment variable
//! 3. `root_folder` in the TOML config file
//! 4. Current working directory (fallback)
//!
//! A missing TOML file is not an error: defaults are used and a warning is
//! logged. Files that the pipeline cannot run without (the vocabulary, the
//! data directory) are located with [`resolve_first_existing`], which fails
//! instead of inventing a location.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Environment variable overriding the root folder
pub const ROOT_ENV_VAR: &str = "NLDT_ROOT";

/// Config file name looked up in the root folder
pub const CONFIG_FILE_NAME: &str = "nldt.toml";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Repository/app root; relative paths below are resolved against it
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Directory holding the domain catalogs (overrides the search list)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Vocabulary file (tried before the conventional locations)
    #[serde(default)]
    pub vocabulary_path: Option<PathBuf>,

    /// Directory for theory documents
    #[serde(default)]
    pub theory_dir: Option<PathBuf>,

    /// Questions per quiz round, used when a catalog does not carry one
    #[serde(default = "default_quiz_length")]
    pub quiz_length: u32,

    /// Multiple-choice options, used when a catalog does not carry one
    #[serde(default = "default_mcq_options")]
    pub mcq_options: u32,

    /// Delay between requests to the scraped source
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file, written in addition to the console when set
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            data_dir: None,
            vocabulary_path: None,
            theory_dir: None,
            quiz_length: default_quiz_length(),
            mcq_options: default_mcq_options(),
            request_delay_ms: default_request_delay_ms(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

fn default_quiz_length() -> u32 {
    10
}

fn default_mcq_options() -> u32 {
    6
}

/// Pause between requests to the scraped source
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 600;

fn default_request_delay_ms() -> u64 {
    DEFAULT_REQUEST_DELAY_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)?;
    if config.quiz_length == 0 || config.mcq_options < 2 {
        return Err(Error::Config(format!(
            "{}: quiz_length must be > 0 and mcq_options >= 2",
            path.display()
        )));
    }
    Ok(config)
}

/// Load the first existing config file, or defaults when none exists
///
/// A file that exists but fails to parse is an error; absence is not.
pub fn load_or_default(candidates: &[PathBuf]) -> Result<TomlConfig> {
    match candidates.iter().find(|p| p.is_file()) {
        Some(path) => {
            info!("Loading config from {}", path.display());
            load_toml_config(path)
        }
        None => {
            warn!("No config file found; using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Conventional config file locations, highest priority first
pub fn config_file_candidates(root: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![root.join(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("nldt").join("config.toml"));
    }
    candidates
}

/// Return the first candidate path that exists
///
/// Fails with [`Error::NotFound`] naming every candidate; never falls back to
/// a fabricated location.
pub fn resolve_first_existing(what: &str, candidates: &[PathBuf]) -> Result<PathBuf> {
    for candidate in candidates {
        if candidate.exists() {
            debug!(what, path = %candidate.display(), "Resolved location");
            return Ok(candidate.clone());
        }
    }
    Err(Error::NotFound {
        what: what.to_string(),
        candidates: candidates.to_vec(),
    })
}

/// Resolve a possibly relative path against the root folder
pub fn under_root(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Root folder resolver
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>) -> Self {
        Self { cli_arg }
    }

    /// Resolve the root folder following the priority order in the module docs
    pub fn resolve(&self, config: &TomlConfig) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &config.root_folder {
            return path.clone();
        }

        PathBuf::from(".")
    }
}
