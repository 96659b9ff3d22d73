//! Configuration for the stepwise agents
//!
//! Settings come from the process environment only. Nothing is persisted.

use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

pub mod paths;

pub use paths::{default_log_dir, log_file_name};

/// Credential for the hosted model
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Override for the chat-completion endpoint base
pub const API_BASE_VAR: &str = "OPENAI_BASE_URL";
pub const MODEL_VAR: &str = "STEPWISE_MODEL";
pub const TEMPERATURE_VAR: &str = "STEPWISE_TEMPERATURE";
pub const LOG_DIR_VAR: &str = "STEPWISE_LOG_DIR";

/// Errors in configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("INVALID SETTING {key}={value}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_api_base(),
            model: default_model(),
            temperature: default_temperature(),
            log_dir: default_log_dir(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

impl Config {
    /// Build from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Config {
            api_key: get(API_KEY_VAR),
            ..Config::default()
        };

        if let Some(base) = get(API_BASE_VAR) {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(model) = get(MODEL_VAR) {
            config.model = model;
        }
        if let Some(raw) = get(TEMPERATURE_VAR) {
            config.temperature = parse_temperature(&raw)?;
        }
        if let Some(dir) = get(LOG_DIR_VAR) {
            config.log_dir = PathBuf::from(dir);
        }

        debug!(
            "◆ CONFIG RESOLVED: model={} remote={} log_dir={:?}",
            config.model,
            config.has_api_key(),
            config.log_dir
        );
        Ok(config)
    }

    /// Whether a hosted model credential is present
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Replace the log directory (CLI override)
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// Log file for the given tutorial level
    pub fn log_path(&self, level: u8) -> PathBuf {
        self.log_dir.join(log_file_name(level))
    }
}

fn parse_temperature(raw: &str) -> Result<f32> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: TEMPERATURE_VAR.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let value: f32 = raw.parse().map_err(|_| invalid("not a number"))?;
    if !(0.0..=2.0).contains(&value) {
        return Err(invalid("must be between 0 and 2"));
    }
    Ok(value)
}
