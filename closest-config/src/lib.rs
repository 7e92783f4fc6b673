//! Domain-driven configuration management
//!
//! Configuration split by functional domain, with validation, defaults, and
//! environment variable support under the `CLOSEST_` prefix. Environment
//! overrides are the mechanism that reaches every process in the worker
//! tree, since children inherit the coordinator's environment.

pub mod domains;
pub mod error;
pub mod loader;
pub mod validation;

// Re-export main types
pub use domains::{ClosestConfig, ExecutionConfig, LogLevel, LoggingConfig};
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;
