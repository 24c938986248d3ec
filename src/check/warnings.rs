//! Shard allocation, segment and resource warnings.

use std::collections::HashMap;
use std::sync::Arc;

use crate::check::models::{ResourceUsage, ResourceWarnings, SegmentWarnings, ShardWarnings};
use crate::check::system_index::is_system_index;
use crate::core::constants::{
    BALANCE_RATIO_THRESHOLD, MSG_CONSIDER_REBALANCING, MSG_SHARD_HEALTHY, SHARD_STATE_INITIALIZING,
    SHARD_STATE_RELOCATING, SHARD_STATE_STARTED, SHARD_STATE_UNASSIGNED,
};
use crate::core::{DynamicThresholds, Result};
use crate::decode::{CatShardRow, IndexStatsDoc};
use crate::source::ClusterDataSource;

/// Derives warnings from shard listings, index stats and resource usage.
#[derive(Clone)]
pub struct WarningAnalyzer {
    source: Arc<dyn ClusterDataSource>,
}

impl WarningAnalyzer {
    pub fn new(source: Arc<dyn ClusterDataSource>) -> Self {
        Self { source }
    }

    pub async fn shard_warnings(&self) -> Result<ShardWarnings> {
        let shards = self
            .source
            .shards()
            .await
            .map_err(|e| e.in_operation("Shard info request"))?;
        Ok(analyze_shards(&CatShardRow::list(&shards)))
    }

    pub async fn segment_warnings(&self, thresholds: &DynamicThresholds) -> Result<SegmentWarnings> {
        let stats = self
            .source
            .index_stats("")
            .await
            .map_err(|e| e.in_operation("Segments info request"))?;
        Ok(analyze_segments(&IndexStatsDoc::list(&stats), thresholds))
    }
}

/// Classify shard states and measure how evenly started shards are spread.
pub fn analyze_shards(shards: &[CatShardRow]) -> ShardWarnings {
    let mut warnings = ShardWarnings {
        unassigned_shards: 0,
        relocating_shards: 0,
        initializing_shards: 0,
        unbalanced_ratio: 1.0,
        unbalanced_shards: false,
        critical_issues: Vec::new(),
        warning_issues: Vec::new(),
        recommendations: Vec::new(),
    };

    let mut per_node: HashMap<&str, usize> = HashMap::new();
    for shard in shards {
        match shard.state.as_str() {
            SHARD_STATE_UNASSIGNED => warnings.unassigned_shards += 1,
            SHARD_STATE_RELOCATING => warnings.relocating_shards += 1,
            SHARD_STATE_INITIALIZING => warnings.initializing_shards += 1,
            SHARD_STATE_STARTED => {
                if let Some(host) = shard.host_key() {
                    *per_node.entry(host).or_insert(0) += 1;
                }
            },
            _ => {},
        }
    }

    if warnings.unassigned_shards > 0 {
        warnings.critical_issues.push(format!(
            "{} unassigned shards detected",
            warnings.unassigned_shards
        ));
        warnings.recommendations.push(format!(
            "Investigate {} unassigned shards (GET _cluster/allocation/explain)",
            warnings.unassigned_shards
        ));
    }

    if warnings.relocating_shards > 0 {
        warnings.warning_issues.push(format!(
            "{} shards are relocating",
            warnings.relocating_shards
        ));
    }

    if warnings.initializing_shards > 0 {
        warnings.warning_issues.push(format!(
            "{} shards are initializing",
            warnings.initializing_shards
        ));
    }

    if let Some(ratio) = balance_ratio(per_node.values().copied()) {
        warnings.unbalanced_ratio = ratio;
        if ratio < BALANCE_RATIO_THRESHOLD {
            warnings.unbalanced_shards = true;
            warnings.warning_issues.push(format!(
                "Shard distribution is unbalanced (ratio: {:.2})",
                ratio
            ));
            warnings.recommendations.push(MSG_CONSIDER_REBALANCING.to_string());
        }
    }

    if warnings.critical_issues.is_empty() && warnings.warning_issues.is_empty() {
        warnings.recommendations.push(MSG_SHARD_HEALTHY.to_string());
    }

    warnings
}

/// min/max of per-node shard counts; `None` with fewer than two nodes.
pub fn balance_ratio<I>(counts: I) -> Option<f64>
where
    I: IntoIterator<Item = usize>,
{
    let counts: Vec<usize> = counts.into_iter().collect();
    if counts.len() < 2 {
        return None;
    }

    let min = counts.iter().copied().min()?;
    let max = counts.iter().copied().max()?;
    if max == 0 {
        return None;
    }

    Some(min as f64 / max as f64)
}

/// Count non-system indices with too many, too small or too large segments.
pub fn analyze_segments(stats: &[IndexStatsDoc], thresholds: &DynamicThresholds) -> SegmentWarnings {
    let mut warnings = SegmentWarnings::default();

    for index in stats.iter().filter(|s| !is_system_index(&s.name)) {
        if index.segment_count > thresholds.high_segment_threshold {
            warnings.high_segment_indices += 1;
        }

        let avg_segment_bytes = if index.segment_count > 0 {
            index.total_size_bytes / index.segment_count as u64
        } else {
            0
        };

        if avg_segment_bytes < thresholds.small_segment_threshold {
            warnings.small_segment_indices += 1;
        }
        if avg_segment_bytes > thresholds.large_segment_threshold {
            warnings.large_segment_indices += 1;
        }
    }

    warnings
}

/// Compare resource usage against the dynamic thresholds.
pub fn analyze_resources(usage: &ResourceUsage, thresholds: &DynamicThresholds) -> ResourceWarnings {
    let mut warnings = ResourceWarnings::default();

    if usage.node_count == 0 {
        return warnings;
    }

    if usage.cpu_usage_max > thresholds.high_cpu_threshold {
        warnings.warnings.push(format!(
            "High CPU usage on {}: {:.1}% (threshold {:.1}%)",
            usage.cpu_usage_max_node, usage.cpu_usage_max, thresholds.high_cpu_threshold
        ));
    }

    if usage.heap_usage_max > thresholds.high_heap_threshold {
        warnings.warnings.push(format!(
            "High heap usage on {}: {:.1}% (threshold {:.1}%)",
            usage.heap_usage_max_node, usage.heap_usage_max, thresholds.high_heap_threshold
        ));
    }

    if usage.memory_usage > thresholds.high_memory_threshold {
        warnings.warnings.push(format!(
            "High average memory usage: {:.1}% (threshold {:.1}%)",
            usage.memory_usage, thresholds.high_memory_threshold
        ));
    }

    let disk_used = usage.disk_used_percent();
    if disk_used > thresholds.high_disk_threshold {
        warnings.warnings.push(format!(
            "High disk usage: {:.1}% (threshold {:.1}%)",
            disk_used, thresholds.high_disk_threshold
        ));
    }

    warnings
}
