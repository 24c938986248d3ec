//! Cluster diagnostics: health snapshots, warnings and shard-sizing advice.

pub mod health;
pub mod models;
pub mod report;
pub mod scale;
pub mod system_index;
pub mod warnings;

pub use health::HealthAggregator;
pub use models::*;
pub use report::{run_full_check, CheckReport, CheckRunner};
pub use scale::ShardScalingAdvisor;
pub use system_index::is_system_index;
pub use warnings::WarningAnalyzer;
