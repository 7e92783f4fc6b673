//! Domain-specific configuration modules

pub mod execution;
pub mod logging;

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::validation::Validatable;

pub use execution::ExecutionConfig;
pub use logging::{LogLevel, LoggingConfig};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosestConfig {
    /// Worker execution settings
    pub execution: ExecutionConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl ClosestConfig {
    /// Validate all domains
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.execution.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
