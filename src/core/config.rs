//! Configuration management for escope.
//!
//! This module provides configuration handling with:
//! - YAML file support
//! - Environment variable and CLI overrides (applied by the CLI layer)
//! - Validation and defaults

use crate::core::constants::{DEFAULT_CHECK_TIMEOUT_SECS, DEFAULT_INTERVAL_SECS};
use crate::core::{EscopeError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name, looked up in the home directory
pub const CONFIG_FILE_NAME: &str = ".escope.yaml";

/// Complete configuration for escope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cluster connection
    pub connection: ConnectionConfig,
    /// Check execution
    pub check: CheckConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Debug mode
    #[serde(skip)]
    pub debug: bool,
}

/// Cluster connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Base URL of the cluster
    pub host: String,
    /// Basic auth user
    pub username: Option<String>,
    /// Basic auth password
    pub password: Option<String>,
    /// Transport-level timeout for a single request
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
}

/// Check execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Upper bound for each individual check
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Sampling interval used when none is given
    #[serde(with = "humantime_serde")]
    pub default_interval: Duration,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            host: "http://localhost:9200".to_string(),
            username: None,
            password: None,
            request_timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            timeout: Duration::from_secs(DEFAULT_CHECK_TIMEOUT_SECS),
            default_interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: LogLevel::Warn,
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.connection.host.trim().is_empty() {
            return Err(EscopeError::config("connection host must not be empty"));
        }

        if !self.connection.host.starts_with("http://")
            && !self.connection.host.starts_with("https://")
        {
            return Err(EscopeError::config(format!(
                "connection host must start with http:// or https://, got '{}'",
                self.connection.host
            )));
        }

        if self.connection.password.is_some() && self.connection.username.is_none() {
            return Err(EscopeError::config("password given without a username"));
        }

        if self.connection.request_timeout.is_zero() {
            return Err(EscopeError::config("request_timeout must be greater than 0"));
        }

        if self.check.timeout.is_zero() {
            return Err(EscopeError::config("check timeout must be greater than 0"));
        }

        if self.check.default_interval.is_zero() {
            return Err(EscopeError::config("default_interval must be greater than 0"));
        }

        Ok(())
    }

    /// Default config file location in the user's home directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }
}

impl LogLevel {
    /// Convert to tracing filter string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Configuration builder for programmatic construction
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        ConfigBuilder {
            config: Config::default(),
        }
    }

    /// Load configuration from YAML string
    pub fn from_yaml(mut self, yaml: &str) -> Result<Self> {
        self.config = serde_yaml::from_str(yaml)
            .map_err(|e| EscopeError::config(format!("Failed to parse YAML config: {}", e)))?;
        Ok(self)
    }

    /// Load configuration from a YAML file
    pub async fn from_file(self, path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            EscopeError::config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        self.from_yaml(&content)
    }

    /// Set cluster host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.connection.host = host.into();
        self
    }

    /// Set basic auth user
    pub fn username<S: Into<String>>(mut self, username: S) -> Self {
        self.config.connection.username = Some(username.into());
        self
    }

    /// Set basic auth password
    pub fn password<S: Into<String>>(mut self, password: S) -> Self {
        self.config.connection.password = Some(password.into());
        self
    }

    /// Set per-check timeout
    pub fn check_timeout(mut self, timeout: Duration) -> Self {
        self.config.check.timeout = timeout;
        self
    }

    /// Set default sampling interval
    pub fn default_interval(mut self, interval: Duration) -> Self {
        self.config.check.default_interval = interval;
        self
    }

    /// Set log level
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set debug mode
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.check.timeout, Duration::from_secs(5));
        assert_eq!(config.check.default_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_host() {
        assert!(ConfigBuilder::new().host("").build().is_err());
        assert!(ConfigBuilder::new().host("localhost:9200").build().is_err());
        assert!(ConfigBuilder::new().host("https://es.internal:9200").build().is_ok());
    }

    #[test]
    fn test_zero_durations_rejected() {
        assert!(ConfigBuilder::new().check_timeout(Duration::ZERO).build().is_err());
        assert!(ConfigBuilder::new().default_interval(Duration::ZERO).build().is_err());
    }

    #[test]
    fn test_password_requires_username() {
        let mut config = Config::default();
        config.connection.password = Some("secret".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .host("http://es:9200")
            .username("elastic")
            .password("changeme")
            .check_timeout(Duration::from_secs(10))
            .log_level(LogLevel::Debug)
            .debug(true)
            .build()
            .unwrap();

        assert_eq!(config.connection.host, "http://es:9200");
        assert_eq!(config.connection.username.as_deref(), Some("elastic"));
        assert_eq!(config.connection.password.as_deref(), Some("changeme"));
        assert_eq!(config.check.timeout, Duration::from_secs(10));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.debug);
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
connection:
  host: "https://search.example.com:9243"
  username: monitor
  password: hunter2
  request_timeout: 10s
check:
  timeout: 3s
  default_interval: 5s
logging:
  level: info
"#;

        let config = ConfigBuilder::new().from_yaml(yaml).unwrap().build().unwrap();

        assert_eq!(config.connection.host, "https://search.example.com:9243");
        assert_eq!(config.connection.password.as_deref(), Some("hunter2"));
        assert_eq!(config.connection.request_timeout, Duration::from_secs(10));
        assert_eq!(config.check.timeout, Duration::from_secs(3));
        assert_eq!(config.check.default_interval, Duration::from_secs(5));
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ConfigBuilder::new()
            .from_yaml("check:\n  timeout: 1s\n")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.check.timeout, Duration::from_secs(1));
        assert_eq!(config.check.default_interval, Duration::from_secs(2));
        assert_eq!(config.connection.host, "http://localhost:9200");
    }
}
