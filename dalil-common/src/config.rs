//! Configuration loading and config file resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `DALIL_CONFIG` environment variable
//! 3. Per-user config file (`~/.config/dalil/config.toml` on Linux)
//! 4. Built-in defaults (fallback)
//!
//! A missing config file is not an error: the built-in defaults are used and
//! [`ConfigSource::log`] reports it as a warning. A file that exists but does
//! not parse or names an unknown log level is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "DALIL_CONFIG";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// JSON record list used by the command-line search
    pub records_path: Option<PathBuf>,

    pub logging: LoggingConfig,

    pub location: LocationConfig,

    pub audio: AudioConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Options handed to the location collaborator
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Upper bound on a single position request
    pub timeout_ms: u64,

    /// Oldest cached fix that is still accepted
    pub maximum_age_ms: u64,

    pub high_accuracy: bool,
}

impl LocationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn maximum_age(&self) -> Duration {
        Duration::from_millis(self.maximum_age_ms)
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            maximum_age_ms: 60_000,
            high_accuracy: false,
        }
    }
}

/// Audio session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// URIs starting with this prefix are already servable
    pub static_prefix: String,

    /// Where bare audio file names are served from
    pub audio_base: String,

    /// Session event channel capacity
    pub event_capacity: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            static_prefix: "/static/".to_string(),
            audio_base: "/static/audio/".to_string(),
            event_capacity: 100,
        }
    }
}

/// Accepted `logging.level` values
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl TomlConfig {
    /// Parse and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TomlConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let level = self.logging.level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::Config(format!(
                "unknown logging.level '{}' (expected one of {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

/// Where the effective configuration came from
///
/// Returned alongside the config because loading happens before a tracing
/// subscriber exists; the caller logs it once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// A path was configured but no file exists there
    Missing(PathBuf),
    /// No path configured at all
    Defaults,
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => {
                info!("Loaded configuration from {}", path.display())
            }
            ConfigSource::Missing(path) => warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            ),
            ConfigSource::Defaults => {
                debug!("No config file configured, using built-in defaults")
            }
        }
    }
}

/// Pick the config file to read, following the priority order above
///
/// Returns `None` when no candidate applies; the caller then uses defaults.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Per-user config file, only if present
    default_config_path().filter(|path| path.exists())
}

/// Resolve and load configuration, degrading to defaults when no file exists
pub fn load_config(cli_arg: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    match resolve_config_path(cli_arg) {
        Some(path) if path.exists() => {
            let config = TomlConfig::load(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
        Some(path) => Ok((TomlConfig::default(), ConfigSource::Missing(path))),
        None => Ok((TomlConfig::default(), ConfigSource::Defaults)),
    }
}

/// Platform config file location
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dalil").join("config.toml"))
}
