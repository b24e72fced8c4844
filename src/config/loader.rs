//! Configuration Loader
//!
//! Loads and validates engine configuration from TOML files matching
//! config/default.toml structure.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::detectors::DetectorParams;
use crate::ensemble::EnsembleConfig;
use crate::sizing::RiskAccount;

/// Main configuration structure matching config/default.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ensemble: EnsembleConfig,
    pub detectors: DetectorParams,
    pub risk: RiskAccount,
    pub logging: LoggingSection,
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ensemble.validate().map_err(ConfigError::ValidationError)?;
        self.detectors.validate().map_err(ConfigError::ValidationError)?;
        self.risk
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        let level = self.logging.level.as_str();
        if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
            return Err(ConfigError::ValidationError(format!(
                "unknown log level '{level}'"
            )));
        }
        Ok(())
    }
}
