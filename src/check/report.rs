//! One full diagnostic pass over the cluster.
//!
//! The ten checks run one after another, each under its own timeout, and
//! each lands in its own result slot. A failing check never prevents the
//! others from running.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::check::health::HealthAggregator;
use crate::check::models::{
    ClusterInfo, IndexHealth, NodeBreakdown, NodeHealth, Performance, ResourceUsage,
    ResourceWarnings, ScaleWarnings, SegmentWarnings, Severity, ShardHealth, ShardWarnings,
};
use crate::check::scale::ShardScalingAdvisor;
use crate::check::warnings::{analyze_resources, WarningAnalyzer};
use crate::core::{execute_with_timeout, DynamicThresholds, EscopeError, Result};
use crate::source::ClusterDataSource;

/// Results of every check from a single run.
#[derive(Debug)]
pub struct CheckReport {
    pub timestamp: DateTime<Utc>,
    pub thresholds: DynamicThresholds,
    pub cluster: Result<ClusterInfo>,
    pub nodes: Result<Vec<NodeHealth>>,
    pub shards: Result<ShardHealth>,
    pub shard_warnings: Result<ShardWarnings>,
    pub indices: Result<Vec<IndexHealth>>,
    pub resources: Result<ResourceUsage>,
    /// Present whenever resource usage was collected
    pub resource_warnings: Option<ResourceWarnings>,
    pub performance: Result<Performance>,
    pub segment_warnings: Result<SegmentWarnings>,
    pub scale_warnings: Result<ScaleWarnings>,
    pub node_breakdown: Result<NodeBreakdown>,
}

impl CheckReport {
    /// Checks that did not complete, with their errors, in run order.
    pub fn failures(&self) -> Vec<(&'static str, &EscopeError)> {
        let slots: [(&'static str, Option<&EscopeError>); 10] = [
            (CLUSTER_CHECK, self.cluster.as_ref().err()),
            (NODES_CHECK, self.nodes.as_ref().err()),
            (SHARDS_CHECK, self.shards.as_ref().err()),
            (SHARD_WARNINGS_CHECK, self.shard_warnings.as_ref().err()),
            (INDICES_CHECK, self.indices.as_ref().err()),
            (RESOURCES_CHECK, self.resources.as_ref().err()),
            (PERFORMANCE_CHECK, self.performance.as_ref().err()),
            (SEGMENTS_CHECK, self.segment_warnings.as_ref().err()),
            (SCALE_CHECK, self.scale_warnings.as_ref().err()),
            (NODE_BREAKDOWN_CHECK, self.node_breakdown.as_ref().err()),
        ];

        slots
            .into_iter()
            .filter_map(|(name, err)| err.map(|e| (name, e)))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failures().is_empty()
    }
}

const CLUSTER_CHECK: &str = "Cluster check";
const NODES_CHECK: &str = "Nodes check";
const SHARDS_CHECK: &str = "Shards check";
const SHARD_WARNINGS_CHECK: &str = "Shard warnings check";
const INDICES_CHECK: &str = "Indices check";
const RESOURCES_CHECK: &str = "Resources check";
const PERFORMANCE_CHECK: &str = "Performance check";
const SEGMENTS_CHECK: &str = "Segments check";
const SCALE_CHECK: &str = "Scale check";
const NODE_BREAKDOWN_CHECK: &str = "Node breakdown check";
const THRESHOLDS_STEP: &str = "Threshold calculation";

/// Runs the full set of checks against one data source.
#[derive(Clone)]
pub struct CheckRunner {
    source: Arc<dyn ClusterDataSource>,
    health: HealthAggregator,
    warnings: WarningAnalyzer,
    advisor: ShardScalingAdvisor,
    timeout: Duration,
}

impl CheckRunner {
    pub fn new(source: Arc<dyn ClusterDataSource>, timeout: Duration) -> Self {
        Self {
            health: HealthAggregator::new(Arc::clone(&source)),
            warnings: WarningAnalyzer::new(Arc::clone(&source)),
            advisor: ShardScalingAdvisor::new(Arc::clone(&source)),
            source,
            timeout,
        }
    }

    pub async fn run(&self) -> CheckReport {
        let timestamp = Utc::now();
        tracing::debug!(timeout_ms = self.timeout.as_millis() as u64, "Running full check");

        let thresholds = self.thresholds().await;

        let cluster = execute_with_timeout(CLUSTER_CHECK, self.timeout, self.health.cluster_info()).await;
        let nodes = execute_with_timeout(NODES_CHECK, self.timeout, self.health.node_health()).await;
        let shards = execute_with_timeout(SHARDS_CHECK, self.timeout, self.health.shard_health()).await;
        let shard_warnings =
            execute_with_timeout(SHARD_WARNINGS_CHECK, self.timeout, self.warnings.shard_warnings()).await;
        let indices = execute_with_timeout(INDICES_CHECK, self.timeout, self.health.index_health()).await;
        let resources =
            execute_with_timeout(RESOURCES_CHECK, self.timeout, self.health.resource_usage()).await;
        let performance =
            execute_with_timeout(PERFORMANCE_CHECK, self.timeout, self.health.performance()).await;
        let segment_warnings = execute_with_timeout(
            SEGMENTS_CHECK,
            self.timeout,
            self.warnings.segment_warnings(&thresholds),
        )
        .await;
        let scale_warnings =
            execute_with_timeout(SCALE_CHECK, self.timeout, self.advisor.scale_warnings()).await;
        let node_breakdown =
            execute_with_timeout(NODE_BREAKDOWN_CHECK, self.timeout, self.health.node_breakdown()).await;

        let resource_warnings = resources
            .as_ref()
            .ok()
            .map(|usage| analyze_resources(usage, &thresholds));

        let report = CheckReport {
            timestamp,
            thresholds,
            cluster,
            nodes,
            shards,
            shard_warnings,
            indices,
            resources,
            resource_warnings,
            performance,
            segment_warnings,
            scale_warnings,
            node_breakdown,
        };

        tracing::debug!(failed = report.failures().len(), "Check finished");
        report
    }

    // Thresholds for one node when the node count cannot be read.
    async fn thresholds(&self) -> DynamicThresholds {
        let computed = execute_with_timeout(
            THRESHOLDS_STEP,
            self.timeout,
            DynamicThresholds::from_cluster(self.source.as_ref()),
        )
        .await;

        computed.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Using single-node thresholds");
            DynamicThresholds::for_node_count(1)
        })
    }
}

/// Run every check once with a per-check `timeout`.
pub async fn run_full_check(source: Arc<dyn ClusterDataSource>, timeout: Duration) -> CheckReport {
    CheckRunner::new(source, timeout).run().await
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cluster check at {}", self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"))?;

        section(f, "Cluster", &self.cluster, |f, c| {
            writeln!(f, "  name: {}  status: {}", c.cluster_name, c.status)?;
            writeln!(f, "  nodes: {} ({} data)", c.number_of_nodes, c.number_of_data_nodes)?;
            writeln!(
                f,
                "  shards: {} active, {} primary, {} unassigned ({:.1}% active)",
                c.active_shards, c.active_primary_shards, c.unassigned_shards, c.active_shards_percent
            )?;
            writeln!(f, "  pending tasks: {}", c.pending_tasks)
        })?;

        section(f, "Nodes", &self.nodes, |f, nodes| {
            for node in nodes {
                writeln!(f, "  {}  cpu {:.1}%  heap {:.1}%", node.name, node.cpu_usage, node.heap_usage)?;
            }
            Ok(())
        })?;

        section(f, "Node roles", &self.node_breakdown, |f, b| {
            writeln!(f, "  total: {}", b.total_nodes)?;
            writeln!(f, "  master-eligible: {}", b.master_eligible.join(", "))?;
            writeln!(f, "  data: {}", b.data.join(", "))?;
            writeln!(f, "  ingest: {}", b.ingest.join(", "))?;
            writeln!(f, "  coordinating-only: {}", b.coordinating_only.join(", "))
        })?;

        section(f, "Shards", &self.shards, |f, s| {
            writeln!(
                f,
                "  started {}  initializing {}  relocating {}  unassigned {}",
                s.started_shards, s.initializing_shards, s.relocating_shards, s.unassigned_shards
            )
        })?;

        section(f, "Shard warnings", &self.shard_warnings, |f, w| {
            writeln!(f, "  balance ratio: {:.2}", w.unbalanced_ratio)?;
            for issue in &w.critical_issues {
                writeln!(f, "  {}: {issue}", Severity::Critical)?;
            }
            for issue in &w.warning_issues {
                writeln!(f, "  {}: {issue}", Severity::Warning)?;
            }
            for rec in &w.recommendations {
                writeln!(f, "  -> {rec}")?;
            }
            Ok(())
        })?;

        section(f, "Indices", &self.indices, |f, indices| {
            for index in indices {
                writeln!(
                    f,
                    "  {} [{}] {} pri/{} rep, {} docs, {}",
                    index.name,
                    index.health,
                    index.primary_shards,
                    index.replica_shards,
                    index.docs_count,
                    index.store_size
                )?;
            }
            Ok(())
        })?;

        section(f, "Resources", &self.resources, |f, r| {
            writeln!(
                f,
                "  cpu avg {:.1}%  min {:.1}% ({})  max {:.1}% ({})",
                r.cpu_usage, r.cpu_usage_min, r.cpu_usage_min_node, r.cpu_usage_max, r.cpu_usage_max_node
            )?;
            writeln!(
                f,
                "  heap avg {:.1}%  min {:.1}% ({})  max {:.1}% ({})",
                r.heap_usage,
                r.heap_usage_min,
                r.heap_usage_min_node,
                r.heap_usage_max,
                r.heap_usage_max_node
            )?;
            writeln!(f, "  memory avg {:.1}%  disk used {:.1}%", r.memory_usage, r.disk_used_percent())
        })?;
        if let Some(warnings) = &self.resource_warnings {
            for warning in &warnings.warnings {
                writeln!(f, "  {}: {warning}", Severity::Warning)?;
            }
        }

        section(f, "Performance", &self.performance, |f, p| {
            writeln!(
                f,
                "  indexing: {} ops, {:.2} ms avg",
                p.index_total,
                p.avg_index_latency_ms()
            )?;
            writeln!(f, "  search: {} queries, {:.2} ms avg", p.query_total, p.avg_query_latency_ms())
        })?;

        section(f, "Segments", &self.segment_warnings, |f, s| {
            writeln!(
                f,
                "  indices with >{} segments: {}",
                self.thresholds.high_segment_threshold, s.high_segment_indices
            )?;
            writeln!(f, "  indices with small segments: {}", s.small_segment_indices)?;
            writeln!(f, "  indices with large segments: {}", s.large_segment_indices)
        })?;

        section(f, "Scale", &self.scale_warnings, |f, s| {
            if s.over_scaled_indices.is_empty() {
                return writeln!(f, "  no shard sizing issues");
            }
            for index in &s.over_scaled_indices {
                writeln!(f, "  {} [{}]: {}", index.severity, index.warning_type, index.warning_message)?;
            }
            Ok(())
        })
    }
}

fn section<T, F>(f: &mut fmt::Formatter<'_>, title: &str, result: &Result<T>, body: F) -> fmt::Result
where
    F: FnOnce(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
{
    writeln!(f)?;
    writeln!(f, "{title}")?;
    match result {
        Ok(value) => body(f, value),
        Err(error) => writeln!(f, "  unavailable: {error}"),
    }
}
