//! escope - health diagnostics for Elasticsearch clusters.
//!
//! escope turns the loosely typed statistics a cluster reports into typed
//! health snapshots, derives warnings from them, and recommends a primary
//! shard count per index. A full check can also be repeated on a timer.
//!
//! # Architecture
//!
//! - `source`: the read-only [`source::ClusterDataSource`] capability and its HTTP adapter
//! - `decode`: defensive field extraction and typed response records
//! - `check`: health snapshots, warnings, shard-sizing advice and the combined report
//! - `monitoring`: bounded continuous sampling
//! - `core`: errors, configuration, constants and dynamic thresholds
//! - `cli`: command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use escope_lib::check::run_full_check;
//! use escope_lib::core::Config;
//! use escope_lib::source::HttpDataSource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let source = Arc::new(HttpDataSource::new(&config.connection)?);
//!     let report = run_full_check(source, config.check.timeout).await;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod check;
pub mod cli;
pub mod core;
pub mod decode;
pub mod monitoring;
pub mod source;

// Re-export core types for convenience
pub use crate::core::{Config, EscopeError, Result};
