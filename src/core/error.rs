use thiserror::Error;

use crate::core::constants::MSG_TIMEOUT_GENERIC;

#[derive(Error, Debug)]
pub enum EscopeError {
    #[error("{operation} failed: {message}")]
    DataSource { operation: String, message: String },

    #[error("{operation}: {}", MSG_TIMEOUT_GENERIC)]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Invalid duration format '{0}' (valid formats: 1m, 5m, 1h)")]
    InvalidDuration(String),

    #[error("Invalid interval format '{0}' (valid formats: 2s, 5s, 1m)")]
    InvalidInterval(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for escope operations
pub type Result<T> = std::result::Result<T, EscopeError>;

impl EscopeError {
    /// Creates a new data source error for the named operation
    pub fn data_source<O: Into<String>, M: ToString>(operation: O, message: M) -> Self {
        Self::DataSource {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Creates a new timeout error for the named operation
    pub fn timeout<O: Into<String>>(operation: O, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    /// Attach the name of the failed operation, keeping timeouts distinct
    pub fn in_operation<O: Into<String>>(self, operation: O) -> Self {
        match self {
            Self::Timeout { .. } => self,
            other => Self::data_source(operation, other),
        }
    }

    /// Creates a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true if the error came from a fetch that exceeded its bound
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::DataSource { .. } | Self::Http(_) => "data_source",
            Self::Timeout { .. } => "timeout",
            Self::InvalidDuration(_) | Self::InvalidInterval(_) => "validation",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) | Self::Yaml(_) => "serialization",
        }
    }
}
