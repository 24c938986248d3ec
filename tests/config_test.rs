//! Configuration loading tests.

use clap::Parser;
use escope_lib::cli::Cli;
use escope_lib::core::config::LogLevel;
use escope_lib::core::{Config, ConfigBuilder};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn config_file(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.connection.host, "http://localhost:9200");
    assert_eq!(config.check.timeout, Duration::from_secs(5));
    assert_eq!(config.check.default_interval, Duration::from_secs(2));
    assert_eq!(config.logging.level, LogLevel::Warn);
}

#[tokio::test]
async fn test_builder_from_file() {
    let file = config_file("connection:\n  host: https://es.example:9243\nlogging:\n  level: debug\n");

    let config = ConfigBuilder::new()
        .from_file(file.path())
        .await
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.connection.host, "https://es.example:9243");
    assert_eq!(config.logging.level, LogLevel::Debug);
}

#[tokio::test]
async fn test_cli_loads_explicit_config_file() {
    let file = config_file(
        r#"
connection:
  host: "http://from-file:9200"
  username: reader
check:
  timeout: 2s
  default_interval: 10s
"#,
    );
    let path = file.path().to_str().unwrap();

    let cli = Cli::try_parse_from(["escope", "--config", path, "check"]).unwrap();
    let config = cli.load_config().await.unwrap();

    assert_eq!(config.connection.host, "http://from-file:9200");
    assert_eq!(config.connection.username.as_deref(), Some("reader"));
    assert_eq!(config.check.timeout, Duration::from_secs(2));
    assert_eq!(config.check.default_interval, Duration::from_secs(10));
}

#[tokio::test]
async fn test_cli_flags_override_config_file() {
    let file = config_file("connection:\n  host: http://from-file:9200\n");
    let path = file.path().to_str().unwrap();

    let cli = Cli::try_parse_from([
        "escope",
        "check",
        "--config",
        path,
        "--host",
        "http://from-flag:9200",
        "--debug",
    ])
    .unwrap();
    let config = cli.load_config().await.unwrap();

    assert_eq!(config.connection.host, "http://from-flag:9200");
    assert!(config.debug);
}

#[tokio::test]
async fn test_missing_explicit_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");

    let cli = Cli::try_parse_from(["escope", "--config", missing.to_str().unwrap(), "check"]).unwrap();
    let err = cli.load_config().await.unwrap_err();
    assert_eq!(err.category(), "config");
}

#[tokio::test]
async fn test_invalid_config_file_is_rejected() {
    let file = config_file("check:\n  timeout: 0s\n");
    let path = file.path().to_str().unwrap();

    let cli = Cli::try_parse_from(["escope", "--config", path, "thresholds"]).unwrap();
    assert!(cli.load_config().await.is_err());

    let file = config_file("connection: [not, a, map]\n");
    let path = file.path().to_str().unwrap();
    let cli = Cli::try_parse_from(["escope", "--config", path, "thresholds"]).unwrap();
    assert!(cli.load_config().await.is_err());
}
