//! Snapshot and report types produced by a single check run.
//!
//! All of these are plain values: created fresh per check, never shared
//! between runs, and handed to the caller for rendering.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::core::constants::{
    HIGH_CONFIDENCE, MEDIUM_CONFIDENCE, SEVERITY_CRITICAL, SEVERITY_WARNING,
    WARNING_TYPE_OVER_REPLICATED, WARNING_TYPE_OVER_SCALED, WARNING_TYPE_UNDER_REPLICATED,
    WARNING_TYPE_UNDER_SCALED,
};

/// Overall cluster status as reported by cluster health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStatus {
    Green,
    Yellow,
    Red,
    Unknown,
}

impl ClusterStatus {
    pub fn parse(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "green" => ClusterStatus::Green,
            "yellow" => ClusterStatus::Yellow,
            "red" => ClusterStatus::Red,
            _ => ClusterStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterStatus::Green => "green",
            ClusterStatus::Yellow => "yellow",
            ClusterStatus::Red => "red",
            ClusterStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cluster-level health summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterInfo {
    pub timestamp: DateTime<Utc>,
    pub cluster_name: String,
    pub status: ClusterStatus,
    pub number_of_nodes: usize,
    pub number_of_data_nodes: usize,
    pub active_primary_shards: usize,
    pub active_shards: usize,
    pub unassigned_shards: usize,
    pub relocating_shards: usize,
    pub initializing_shards: usize,
    pub delayed_unassigned_shards: usize,
    pub pending_tasks: usize,
    pub active_shards_percent: f64,
}

/// CPU and heap of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeHealth {
    pub timestamp: DateTime<Utc>,
    pub node_id: String,
    pub name: String,
    pub cpu_usage: f64,
    pub heap_usage: f64,
}

/// Tally of shard states across the cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShardHealth {
    pub timestamp: DateTime<Utc>,
    pub started_shards: usize,
    pub initializing_shards: usize,
    pub relocating_shards: usize,
    pub unassigned_shards: usize,
}

/// Shard allocation problems and advice.
///
/// `unbalanced_ratio` is min/max started shards per node, in `[0, 1]`, and
/// stays at 1.0 when fewer than two nodes hold started shards.
/// `unbalanced_shards` is set exactly when the ratio is below 0.7.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShardWarnings {
    pub unassigned_shards: usize,
    pub relocating_shards: usize,
    pub initializing_shards: usize,
    pub unbalanced_ratio: f64,
    pub unbalanced_shards: bool,
    pub critical_issues: Vec<String>,
    pub warning_issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Per-index snapshot from the index listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexHealth {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub health: String,
    pub status: String,
    pub primary_shards: usize,
    pub replica_shards: usize,
    pub docs_count: u64,
    pub store_size: String,
}

/// Cluster-wide resource usage over data nodes only.
///
/// Min/max node fields read `"<name> - <ip>"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceUsage {
    pub timestamp: DateTime<Utc>,
    /// Number of data nodes the averages are taken over
    pub node_count: usize,
    pub cpu_usage: f64,
    pub cpu_usage_min: f64,
    pub cpu_usage_max: f64,
    pub cpu_usage_min_node: String,
    pub cpu_usage_max_node: String,
    pub heap_usage: f64,
    pub heap_usage_min: f64,
    pub heap_usage_max: f64,
    pub heap_usage_min_node: String,
    pub heap_usage_max_node: String,
    pub memory_usage: f64,
    pub disk_total: u64,
    pub disk_available: u64,
}

impl ResourceUsage {
    /// Percentage of total disk in use, 0 when no disk was reported.
    pub fn disk_used_percent(&self) -> f64 {
        if self.disk_total == 0 {
            return 0.0;
        }
        let used = self.disk_total.saturating_sub(self.disk_available);
        used as f64 / self.disk_total as f64 * 100.0
    }
}

/// Cumulative indexing and search counters. These only grow over the
/// cluster's lifetime; they are not deltas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Performance {
    pub timestamp: DateTime<Utc>,
    pub index_total: u64,
    pub index_time_in_millis: u64,
    pub query_total: u64,
    pub query_time_in_millis: u64,
}

impl Performance {
    /// Mean milliseconds per indexing operation.
    pub fn avg_index_latency_ms(&self) -> f64 {
        average(self.index_time_in_millis, self.index_total)
    }

    /// Mean milliseconds per query.
    pub fn avg_query_latency_ms(&self) -> f64 {
        average(self.query_time_in_millis, self.query_total)
    }
}

fn average(total: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Node names grouped by role.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeBreakdown {
    pub total_nodes: usize,
    pub master_eligible: Vec<String>,
    pub data: Vec<String>,
    pub ingest: Vec<String>,
    pub coordinating_only: Vec<String>,
}

/// Counts of indices with unhealthy segment layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SegmentWarnings {
    pub high_segment_indices: usize,
    pub small_segment_indices: usize,
    pub large_segment_indices: usize,
}

/// Resource usage above the dynamic thresholds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceWarnings {
    pub warnings: Vec<String>,
}

impl ResourceWarnings {
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }
}

/// How many sizing signals backed a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(confidence: f64) -> Self {
        if confidence >= HIGH_CONFIDENCE {
            ConfidenceLevel::High
        } else if confidence >= MEDIUM_CONFIDENCE {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "HIGH",
            ConfidenceLevel::Medium => "MEDIUM",
            ConfidenceLevel::Low => "LOW",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary shard count suggested for one index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShardRecommendation {
    pub recommended: usize,
    pub min_acceptable: usize,
    pub max_acceptable: usize,
    /// Share of sizing signals that had data, in `[0, 1]`
    pub confidence: f64,
    pub reasoning: String,
}

impl ShardRecommendation {
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.confidence)
    }

    /// Whether `shards` lies inside the acceptable range.
    pub fn accepts(&self, shards: usize) -> bool {
        (self.min_acceptable..=self.max_acceptable).contains(&shards)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleWarningType {
    OverScaled,
    UnderScaled,
    OverReplicated,
    UnderReplicated,
}

impl ScaleWarningType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleWarningType::OverScaled => WARNING_TYPE_OVER_SCALED,
            ScaleWarningType::UnderScaled => WARNING_TYPE_UNDER_SCALED,
            ScaleWarningType::OverReplicated => WARNING_TYPE_OVER_REPLICATED,
            ScaleWarningType::UnderReplicated => WARNING_TYPE_UNDER_REPLICATED,
        }
    }
}

impl fmt::Display for ScaleWarningType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => SEVERITY_CRITICAL,
            Severity::Warning => SEVERITY_WARNING,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An index whose shard or replica layout is outside the recommended range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverScaledIndex {
    pub name: String,
    pub primary_shards: usize,
    pub replica_shards: usize,
    pub total_shards: usize,
    pub index_size: u64,
    pub doc_count: u64,
    pub search_rate: f64,
    pub index_rate: f64,
    pub warning_type: ScaleWarningType,
    pub warning_message: String,
    pub recommendation: ShardRecommendation,
    pub severity: Severity,
}

/// All scale findings of one check, in index order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScaleWarnings {
    pub over_scaled_indices: Vec<OverScaledIndex>,
    pub warning_issues: Vec<String>,
}

impl ScaleWarnings {
    pub fn push(&mut self, index: OverScaledIndex) {
        self.warning_issues.push(index.warning_message.clone());
        self.over_scaled_indices.push(index);
    }
}
