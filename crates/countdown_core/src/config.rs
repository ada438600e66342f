//! Countdown configuration.
//!
//! # Responsibility
//! - Hold the tunables for target resolution and refresh cadence.
//! - Parse and validate TOML configuration files.
//!
//! # Invariants
//! - A validated config has a non-empty key and non-zero offset/interval.

use crate::model::MS_PER_DAY;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_STORAGE_KEY: &str = "countdown_target_ms";
pub const DEFAULT_OFFSET_DAYS: u32 = 45;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// What to do with a stored target that has already passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiredTargetPolicy {
    /// Discard it and start a fresh default-offset countdown.
    #[default]
    Restart,
    /// Keep it, so the session starts complete.
    StayComplete,
}

impl ExpiredTargetPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Restart => "restart",
            Self::StayComplete => "stay_complete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CountdownConfig {
    /// Key the target is persisted under.
    pub storage_key: String,
    /// Offset of a fresh target from `now`.
    pub default_offset_days: u32,
    pub tick_interval_ms: u64,
    pub expired_policy: ExpiredTargetPolicy,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_offset_days: DEFAULT_OFFSET_DAYS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            expired_policy: ExpiredTargetPolicy::default(),
        }
    }
}

impl CountdownConfig {
    /// Parses and validates a TOML document. Missing fields take defaults.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage_key cannot be empty".to_string(),
            ));
        }
        if self.default_offset_days == 0 {
            return Err(ConfigError::Invalid(
                "default_offset_days must be greater than zero".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Fresh-target offset in milliseconds.
    pub fn default_offset_ms(&self) -> i64 {
        // u32 days * 86_400_000 stays far below i64::MAX.
        i64::from(self.default_offset_days) * MS_PER_DAY as i64
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config syntax: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}
