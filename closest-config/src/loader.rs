//! Configuration loading and environment variable handling

use std::path::Path;
use std::str::FromStr;

use crate::domains::{ClosestConfig, LogLevel};
use crate::error::{ConfigError, ConfigResult};

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "CLOSEST".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<ClosestConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: ClosestConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<ClosestConfig> {
        let mut config = ClosestConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<ClosestConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut ClosestConfig) -> ConfigResult<()> {
        if let Ok(level) = self.get_env_var("LOG_LEVEL") {
            config.logging.level = LogLevel::from_str(&level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", level)))?;
        }

        if let Ok(binary) = self.get_env_var("WORKER_BINARY") {
            config.execution.worker_binary = Some(binary.into());
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
