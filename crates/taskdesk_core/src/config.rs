//! Core runtime configuration.
//!
//! # Responsibility
//! - Load settings from JSON with defaults for every field.
//! - Apply `TASKDESK_*` environment overrides on top.
//!
//! # Invariants
//! - A loaded config has a supported log level and a non-zero page size.
//! - `log_dir`, when set, is absolute (the logging bootstrap requires it).

use crate::logging::{default_log_level, parse_level};
use crate::view::page::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const ENV_LOG_LEVEL: &str = "TASKDESK_LOG_LEVEL";
const ENV_LOG_DIR: &str = "TASKDESK_LOG_DIR";
const ENV_PAGE_SIZE: &str = "TASKDESK_PAGE_SIZE";
const ENV_SEED_DEMO_DATA: &str = "TASKDESK_SEED_DEMO_DATA";
const ENV_DB_PATH: &str = "TASKDESK_DB_PATH";

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Io(std::io::Error),
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::InvalidValue { key, value } => {
                write!(f, "invalid config value for `{key}`: `{value}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Rolling log directory. Logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
    /// Default task table page size.
    pub page_size: usize,
    /// Seed the store with demo records on startup.
    pub seed_demo_data: bool,
    /// Optional SQLite snapshot file.
    pub db_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            page_size: DEFAULT_PAGE_SIZE,
            seed_demo_data: false,
            db_path: None,
        }
    }
}

impl CoreConfig {
    /// Parses JSON; missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Applies `TASKDESK_*` variables from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, then validates.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.log_dir = non_empty(dir).map(PathBuf::from);
        }
        if let Some(size) = lookup(ENV_PAGE_SIZE) {
            self.page_size = size.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_PAGE_SIZE,
                value: size.clone(),
            })?;
        }
        if let Some(seed) = lookup(ENV_SEED_DEMO_DATA) {
            self.seed_demo_data = parse_flag(&seed).ok_or(ConfigError::InvalidValue {
                key: ENV_SEED_DEMO_DATA,
                value: seed.clone(),
            })?;
        }
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.db_path = non_empty(path).map(PathBuf::from);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if parse_level(&self.log_level).is_none() {
            return Err(ConfigError::InvalidValue {
                key: "log_level",
                value: self.log_level.clone(),
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "page_size",
                value: "0".to_string(),
            });
        }
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    key: "log_dir",
                    value: dir.display().to_string(),
                });
            }
        }
        Ok(())
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
