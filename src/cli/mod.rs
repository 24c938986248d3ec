//! Command-line interface for escope.
//!
//! `escope check` runs every diagnostic once, or repeatedly with
//! `--duration`. `escope thresholds` prints the alert thresholds for a
//! cluster size.

use crate::check::{run_full_check, CheckRunner};
use crate::core::config::ConfigBuilder;
use crate::core::{Config, DynamicThresholds, EscopeError, Result};
use crate::monitoring::ContinuousSampler;
use crate::source::{ClusterDataSource, HttpDataSource};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

/// Health diagnostics for Elasticsearch clusters
#[derive(Parser, Debug)]
#[command(name = "escope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Cluster URL
    #[arg(long, global = true, env = "ESCOPE_HOST")]
    pub host: Option<String>,

    /// Basic auth user
    #[arg(short, long, global = true, env = "ESCOPE_USERNAME")]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(short, long, global = true, env = "ESCOPE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Configuration file path (default: ~/.escope.yaml)
    #[arg(short, long, global = true, env = "ESCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, env = "ESCOPE_DEBUG")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run all health checks
    Check {
        /// Keep sampling for this long (e.g. 1m, 5m, 1h)
        #[arg(long)]
        duration: Option<String>,

        /// Time between samples (e.g. 2s, 5s)
        #[arg(long)]
        interval: Option<String>,
    },
    /// Show alert thresholds for a cluster size
    Thresholds {
        /// Node count to compute for; queries the cluster when omitted
        #[arg(long)]
        nodes: Option<usize>,
    },
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Load configuration with proper precedence:
    /// 1. CLI arguments and environment variables
    /// 2. Config file
    /// 3. Defaults
    pub async fn load_config(&self) -> Result<Config> {
        let mut builder = ConfigBuilder::new();

        let config_path = match (&self.config, Config::default_path()) {
            (Some(path), _) => Some(path.clone()),
            (None, Some(default_path)) if default_path.exists() => Some(default_path),
            _ => None,
        };

        if let Some(path) = config_path {
            match tokio::fs::read_to_string(&path).await {
                Ok(content) => {
                    builder = builder.from_yaml(&content)?;
                    tracing::debug!("Loaded configuration from: {:?}", path);
                },
                Err(e) if self.config.is_some() => {
                    return Err(EscopeError::config(format!(
                        "Failed to read config file {:?}: {}",
                        path, e
                    )));
                },
                Err(_) => {
                    tracing::debug!("No config file found at {:?}, using defaults", path);
                },
            }
        }

        self.apply_overrides(builder).build()
    }

    fn apply_overrides(&self, mut builder: ConfigBuilder) -> ConfigBuilder {
        if let Some(host) = &self.host {
            builder = builder.host(host.clone());
        }
        if let Some(username) = &self.username {
            builder = builder.username(username.clone());
        }
        if let Some(password) = &self.password {
            builder = builder.password(password.clone());
        }
        builder.debug(self.debug)
    }
}

/// Initialize logging. `RUST_LOG` wins, then `--debug`, then the config level.
pub fn init_logging(config: &Config) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if config.debug {
        "debug"
    } else {
        config.logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(config.debug)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| EscopeError::config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Execute the parsed command.
pub async fn execute(cli: Cli) -> Result<()> {
    let config = cli.load_config().await?;
    init_logging(&config)?;

    match &cli.command {
        Command::Check { duration, interval } => {
            let source: Arc<dyn ClusterDataSource> = Arc::new(HttpDataSource::new(&config.connection)?);
            match duration {
                Some(duration) => {
                    run_continuous(&config, source, duration, interval.as_deref().unwrap_or("")).await
                },
                None => {
                    let report = run_full_check(source, config.check.timeout).await;
                    println!("{report}");
                    Ok(())
                },
            }
        },
        Command::Thresholds { nodes } => {
            let thresholds = match nodes {
                Some(count) => DynamicThresholds::for_node_count(*count),
                None => {
                    let source = HttpDataSource::new(&config.connection)?;
                    DynamicThresholds::from_cluster(&source).await?
                },
            };
            print_thresholds(&thresholds);
            Ok(())
        },
    }
}

async fn run_continuous(
    config: &Config,
    source: Arc<dyn ClusterDataSource>,
    duration: &str,
    interval: &str,
) -> Result<()> {
    let runner = CheckRunner::new(source, config.check.timeout);
    let sampler = ContinuousSampler::new(runner.clone(), config.check.default_interval);

    let handle = sampler.cancel_handle();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received interrupt, stopping after the current sample");
            handle.cancel();
        }
    });

    let result = sampler.start(duration, interval).await;
    ctrl_c.abort();
    let result = result?;

    // The samples only confirm the cluster kept answering; the printed
    // report comes from one fresh check.
    if result.sample_count > 0 {
        println!("Collected {} samples", result.sample_count);
        println!("{}", runner.run().await);
    } else {
        println!("No samples collected during monitoring period.");
    }

    Ok(())
}

fn print_thresholds(thresholds: &DynamicThresholds) {
    println!("Segment count:   > {}", thresholds.high_segment_threshold);
    println!("Small segments:  < {} bytes", thresholds.small_segment_threshold);
    println!("Large segments:  > {} bytes", thresholds.large_segment_threshold);
    println!("CPU:             > {:.1}%", thresholds.high_cpu_threshold);
    println!("Memory:          > {:.1}%", thresholds.high_memory_threshold);
    println!("Heap:            > {:.1}%", thresholds.high_heap_threshold);
    println!("Disk:            > {:.1}%", thresholds.high_disk_threshold);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_check_subcommand() {
        let cli = Cli::try_parse_from(["escope", "check", "--duration", "1m", "--interval", "5s"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Check {
                duration: Some("1m".to_string()),
                interval: Some("5s".to_string()),
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "escope",
            "thresholds",
            "--nodes",
            "3",
            "--host",
            "https://es:9200",
            "--debug",
        ])
        .unwrap();
        assert_eq!(cli.command, Command::Thresholds { nodes: Some(3) });
        assert_eq!(cli.host.as_deref(), Some("https://es:9200"));
        assert!(cli.debug);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["escope"]).is_err());
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let cli = Cli::try_parse_from([
            "escope",
            "check",
            "--host",
            "http://override:9200",
            "--username",
            "elastic",
            "--password",
            "changeme",
        ])
        .unwrap();

        let builder = ConfigBuilder::new()
            .from_yaml("connection:\n  host: http://file:9200\ncheck:\n  timeout: 9s\n")
            .unwrap();
        let config = cli.apply_overrides(builder).build().unwrap();

        assert_eq!(config.connection.host, "http://override:9200");
        assert_eq!(config.connection.username.as_deref(), Some("elastic"));
        assert_eq!(config.connection.password.as_deref(), Some("changeme"));
        assert_eq!(config.check.timeout, Duration::from_secs(9));
    }

    #[test]
    fn test_username_flag_keeps_file_password() {
        let cli = Cli::try_parse_from(["escope", "check", "--username", "elastic"]).unwrap();

        let builder = ConfigBuilder::new()
            .from_yaml("connection:\n  username: reader\n  password: secret\n")
            .unwrap();
        let config = cli.apply_overrides(builder).build().unwrap();

        assert_eq!(config.connection.username.as_deref(), Some("elastic"));
        assert_eq!(config.connection.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_password_flag_alone_overrides_file_password() {
        let cli = Cli::try_parse_from(["escope", "check", "--password", "fromflag"]).unwrap();

        let builder = ConfigBuilder::new()
            .from_yaml("connection:\n  username: elastic\n  password: old\n")
            .unwrap();
        let config = cli.apply_overrides(builder).build().unwrap();

        assert_eq!(config.connection.username.as_deref(), Some("elastic"));
        assert_eq!(config.connection.password.as_deref(), Some("fromflag"));
    }
}
