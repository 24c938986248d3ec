//! Shared building blocks: errors, configuration, constants, thresholds.

pub mod config;
pub mod constants;
pub mod error;
pub mod thresholds;
pub mod timeout;

// Re-export commonly used types
pub use config::{Config, ConfigBuilder};
pub use error::{EscopeError, Result};
pub use thresholds::DynamicThresholds;
pub use timeout::execute_with_timeout;
