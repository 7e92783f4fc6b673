//! Worker execution configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::validation::Validatable;

/// Worker execution configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Binary re-executed for worker processes. Unset means the current
    /// executable, which is right for every normal installation; test
    /// harnesses and wrapper scripts can point this elsewhere.
    pub worker_binary: Option<PathBuf>,
}

impl Validatable for ExecutionConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(path) = &self.worker_binary {
            if path.as_os_str().is_empty() {
                return Err(self.validation_error("worker_binary cannot be empty"));
            }
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "execution"
    }
}
