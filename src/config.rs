//! Configuration management for urnfinder
//!
//! Settings are loaded from `./config/urnfinder.toml` when that file exists;
//! otherwise the compiled-in copy of the same file is used. CLI flags
//! override the `[delay]` values.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Configuration file path relative to working directory
pub const CONFIG_PATH: &str = "./config/urnfinder.toml";

/// Default configuration file content - this is the ONLY place defaults exist
pub const DEFAULT_CONFIG: &str = include_str!("../config/urnfinder.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Configuration field '{field}' cannot be empty")]
    EmptyRequired { field: String },

    #[error("Invalid delay range: min {min} exceeds max {max}")]
    InvalidDelayRange { min: f64, max: f64 },

    #[error("Delay values must be non-negative (got min {min}, max {max})")]
    NegativeDelay { min: f64, max: f64 },
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub delay: DelayConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_redirects: usize,
}

/// Inter-request delay range in seconds
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DelayConfig {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl AppConfig {
    /// Load configuration: the file at [`CONFIG_PATH`] if present, the
    /// compiled-in defaults otherwise.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_PATH);
        if path.exists() {
            Self::load_from_path(path)
        } else {
            Self::defaults()
        }
    }

    /// Parse and validate the compiled-in default configuration.
    pub fn defaults() -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.user_agent.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "http.user_agent".to_string(),
            });
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "http.request_timeout_secs".to_string(),
            });
        }
        self.delay.validate()
    }
}

impl DelayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_secs < 0.0 || self.max_secs < 0.0 {
            return Err(ConfigError::NegativeDelay {
                min: self.min_secs,
                max: self.max_secs,
            });
        }
        if self.min_secs > self.max_secs {
            return Err(ConfigError::InvalidDelayRange {
                min: self.min_secs,
                max: self.max_secs,
            });
        }
        Ok(())
    }
}
