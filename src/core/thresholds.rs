//! Alert thresholds that scale with cluster size.
//!
//! Larger clusters tolerate proportionally higher per-node usage and more
//! segments before the same absolute number signals a real problem, so each
//! threshold is a step function of the node count, capped independently.

use serde::Serialize;

use crate::core::constants::{
    BASE_CPU_THRESHOLD, BASE_HEAP_THRESHOLD, BASE_MEMORY_THRESHOLD, BASE_SEGMENT_THRESHOLD,
    HIGH_DISK_THRESHOLD, LARGE_SEGMENT_THRESHOLD, MAX_CPU_THRESHOLD, MAX_HEAP_THRESHOLD,
    MAX_MEMORY_THRESHOLD, NUMBER_OF_NODES_FIELD, SMALL_SEGMENT_THRESHOLD,
};
use crate::core::Result;
use crate::decode::fields;
use crate::source::ClusterDataSource;

/// Thresholds derived once per check from the current node count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DynamicThresholds {
    pub high_segment_threshold: usize,
    pub small_segment_threshold: u64,
    pub large_segment_threshold: u64,
    pub high_cpu_threshold: f64,
    pub high_memory_threshold: f64,
    pub high_heap_threshold: f64,
    pub high_disk_threshold: f64,
}

impl DynamicThresholds {
    /// Compute thresholds for a cluster of `node_count` nodes.
    ///
    /// A node count of zero is treated as one.
    pub fn for_node_count(node_count: usize) -> Self {
        let extra_nodes = node_count.max(1) - 1;

        Self {
            high_segment_threshold: segment_threshold(extra_nodes),
            small_segment_threshold: SMALL_SEGMENT_THRESHOLD,
            large_segment_threshold: LARGE_SEGMENT_THRESHOLD,
            high_cpu_threshold: scaled(BASE_CPU_THRESHOLD, extra_nodes, 2.0, MAX_CPU_THRESHOLD),
            high_memory_threshold: scaled(
                BASE_MEMORY_THRESHOLD,
                extra_nodes,
                1.0,
                MAX_MEMORY_THRESHOLD,
            ),
            high_heap_threshold: scaled(BASE_HEAP_THRESHOLD, extra_nodes, 1.5, MAX_HEAP_THRESHOLD),
            high_disk_threshold: HIGH_DISK_THRESHOLD,
        }
    }

    /// Read the node count from cluster health and compute thresholds for it.
    ///
    /// Fails only when the health request itself fails. A missing or zero
    /// `number_of_nodes` falls back to a single node.
    pub async fn from_cluster(source: &dyn ClusterDataSource) -> Result<Self> {
        let health = source
            .cluster_health()
            .await
            .map_err(|e| e.in_operation("Threshold calculation"))?;

        let node_count = fields::get_u64(&health, NUMBER_OF_NODES_FIELD) as usize;
        if node_count == 0 {
            tracing::warn!("Cluster health did not report a node count, assuming one node");
        }

        Ok(Self::for_node_count(node_count))
    }
}

// 1 node = 1000, 3 nodes = 2000, 10 nodes = 5500; intentionally uncapped
fn segment_threshold(extra_nodes: usize) -> usize {
    let scale_factor = 1.0 + extra_nodes as f64 * 0.5;
    (BASE_SEGMENT_THRESHOLD as f64 * scale_factor) as usize
}

fn scaled(base: f64, extra_nodes: usize, step: f64, cap: f64) -> f64 {
    (base + extra_nodes as f64 * step).min(cap)
}
