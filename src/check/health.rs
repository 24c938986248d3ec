//! Typed health snapshots built from raw cluster responses.
//!
//! Each operation fetches one response, fails only when that fetch fails,
//! and otherwise returns a fully populated snapshot even when individual
//! fields were missing.

use chrono::Utc;
use std::sync::Arc;

use crate::check::models::{
    ClusterInfo, ClusterStatus, IndexHealth, NodeBreakdown, NodeHealth, Performance,
    ResourceUsage, ShardHealth,
};
use crate::core::constants::{
    NODE_ROLE_DATA, NODE_ROLE_INGEST, NODE_ROLE_MASTER, SHARD_STATE_INITIALIZING,
    SHARD_STATE_RELOCATING, SHARD_STATE_STARTED, SHARD_STATE_UNASSIGNED,
};
use crate::core::Result;
use crate::decode::{
    CatIndexRow, CatShardRow, ClusterHealthDoc, ClusterStatsDoc, NodeInfoDoc, NodeStatsDoc,
};
use crate::source::ClusterDataSource;

/// Builds health snapshots from a [`ClusterDataSource`].
#[derive(Clone)]
pub struct HealthAggregator {
    source: Arc<dyn ClusterDataSource>,
}

impl HealthAggregator {
    pub fn new(source: Arc<dyn ClusterDataSource>) -> Self {
        Self { source }
    }

    pub async fn cluster_info(&self) -> Result<ClusterInfo> {
        let health = self
            .source
            .cluster_health()
            .await
            .map_err(|e| e.in_operation("Cluster health request"))?;
        Ok(build_cluster_info(&ClusterHealthDoc::from_value(&health)))
    }

    pub async fn node_health(&self) -> Result<Vec<NodeHealth>> {
        let stats = self
            .source
            .nodes_stats()
            .await
            .map_err(|e| e.in_operation("Nodes stats request"))?;
        Ok(build_node_health(&NodeStatsDoc::list(&stats)))
    }

    pub async fn shard_health(&self) -> Result<ShardHealth> {
        let shards = self
            .source
            .shards()
            .await
            .map_err(|e| e.in_operation("Shards request"))?;
        Ok(build_shard_health(&CatShardRow::list(&shards)))
    }

    pub async fn index_health(&self) -> Result<Vec<IndexHealth>> {
        let indices = self
            .source
            .indices()
            .await
            .map_err(|e| e.in_operation("Indices request"))?;
        Ok(build_index_health(&CatIndexRow::list(&indices)))
    }

    pub async fn resource_usage(&self) -> Result<ResourceUsage> {
        let stats = self
            .source
            .nodes_stats()
            .await
            .map_err(|e| e.in_operation("Nodes stats request"))?;
        Ok(build_resource_usage(&NodeStatsDoc::list(&stats)))
    }

    pub async fn performance(&self) -> Result<Performance> {
        let stats = self
            .source
            .cluster_stats()
            .await
            .map_err(|e| e.in_operation("Cluster stats request"))?;
        Ok(build_performance(&ClusterStatsDoc::from_value(&stats)))
    }

    pub async fn node_breakdown(&self) -> Result<NodeBreakdown> {
        let nodes = self
            .source
            .nodes()
            .await
            .map_err(|e| e.in_operation("Nodes request"))?;
        Ok(build_node_breakdown(&NodeInfoDoc::list(&nodes)))
    }
}

pub fn build_cluster_info(doc: &ClusterHealthDoc) -> ClusterInfo {
    ClusterInfo {
        timestamp: Utc::now(),
        cluster_name: doc.cluster_name.clone(),
        status: ClusterStatus::parse(&doc.status),
        number_of_nodes: doc.number_of_nodes,
        number_of_data_nodes: doc.number_of_data_nodes,
        active_primary_shards: doc.active_primary_shards,
        active_shards: doc.active_shards,
        unassigned_shards: doc.unassigned_shards,
        relocating_shards: doc.relocating_shards,
        initializing_shards: doc.initializing_shards,
        delayed_unassigned_shards: doc.delayed_unassigned_shards,
        pending_tasks: doc.number_of_pending_tasks,
        active_shards_percent: doc.active_shards_percent,
    }
}

pub fn build_node_health(nodes: &[NodeStatsDoc]) -> Vec<NodeHealth> {
    let timestamp = Utc::now();
    nodes
        .iter()
        .map(|node| NodeHealth {
            timestamp,
            node_id: node.id.clone(),
            name: node.name.clone(),
            cpu_usage: node.cpu_percent,
            heap_usage: node.heap_used_percent,
        })
        .collect()
}

pub fn build_shard_health(shards: &[CatShardRow]) -> ShardHealth {
    let mut health = ShardHealth {
        timestamp: Utc::now(),
        started_shards: 0,
        initializing_shards: 0,
        relocating_shards: 0,
        unassigned_shards: 0,
    };

    for shard in shards {
        match shard.state.as_str() {
            SHARD_STATE_STARTED => health.started_shards += 1,
            SHARD_STATE_INITIALIZING => health.initializing_shards += 1,
            SHARD_STATE_RELOCATING => health.relocating_shards += 1,
            SHARD_STATE_UNASSIGNED => health.unassigned_shards += 1,
            _ => {},
        }
    }

    health
}

pub fn build_index_health(indices: &[CatIndexRow]) -> Vec<IndexHealth> {
    let timestamp = Utc::now();
    indices
        .iter()
        .map(|row| IndexHealth {
            timestamp,
            name: row.index.clone(),
            health: row.health.clone(),
            status: row.status.clone(),
            primary_shards: row.primary_shards,
            replica_shards: row.replica_shards,
            docs_count: row.docs_count,
            store_size: row.store_size.clone(),
        })
        .collect()
}

/// Aggregate CPU, heap, memory and disk over data nodes.
///
/// Nodes arrive sorted by id, so when two nodes tie on a metric the one
/// with the smaller id is reported.
pub fn build_resource_usage(nodes: &[NodeStatsDoc]) -> ResourceUsage {
    let mut usage = ResourceUsage {
        timestamp: Utc::now(),
        ..ResourceUsage::default()
    };

    let data_nodes: Vec<&NodeStatsDoc> = nodes.iter().filter(|n| n.is_data_node()).collect();
    usage.node_count = data_nodes.len();
    if data_nodes.is_empty() {
        return usage;
    }

    for node in &data_nodes {
        usage.cpu_usage += node.cpu_percent;
        usage.heap_usage += node.heap_used_percent;
        usage.memory_usage += node.os_mem_used_percent;
        usage.disk_total += node.disk_total_bytes;
        usage.disk_available += node.disk_available_bytes;
    }

    let count = data_nodes.len() as f64;
    usage.cpu_usage /= count;
    usage.heap_usage /= count;
    usage.memory_usage /= count;

    let (cpu_min, cpu_max) = extremes(&data_nodes, |n| n.cpu_percent);
    usage.cpu_usage_min = cpu_min.cpu_percent;
    usage.cpu_usage_max = cpu_max.cpu_percent;
    usage.cpu_usage_min_node = attribution(cpu_min);
    usage.cpu_usage_max_node = attribution(cpu_max);

    let (heap_min, heap_max) = extremes(&data_nodes, |n| n.heap_used_percent);
    usage.heap_usage_min = heap_min.heap_used_percent;
    usage.heap_usage_max = heap_max.heap_used_percent;
    usage.heap_usage_min_node = attribution(heap_min);
    usage.heap_usage_max_node = attribution(heap_max);

    usage
}

// First-seen wins on ties. `nodes` must be non-empty.
fn extremes<'a, F>(nodes: &[&'a NodeStatsDoc], metric: F) -> (&'a NodeStatsDoc, &'a NodeStatsDoc)
where
    F: Fn(&NodeStatsDoc) -> f64,
{
    let mut min = nodes[0];
    let mut max = nodes[0];
    for &node in &nodes[1..] {
        if metric(node) < metric(min) {
            min = node;
        }
        if metric(node) > metric(max) {
            max = node;
        }
    }
    (min, max)
}

fn attribution(node: &NodeStatsDoc) -> String {
    format!("{} - {}", node.name, node.ip)
}

pub fn build_performance(doc: &ClusterStatsDoc) -> Performance {
    Performance {
        timestamp: Utc::now(),
        index_total: doc.index_total,
        index_time_in_millis: doc.index_time_millis,
        query_total: doc.query_total,
        query_time_in_millis: doc.query_time_millis,
    }
}

pub fn build_node_breakdown(nodes: &[NodeInfoDoc]) -> NodeBreakdown {
    let mut breakdown = NodeBreakdown {
        total_nodes: nodes.len(),
        ..NodeBreakdown::default()
    };

    for node in nodes {
        if node.roles.is_empty() {
            breakdown.coordinating_only.push(node.name.clone());
            continue;
        }
        if node.has_role(NODE_ROLE_MASTER) {
            breakdown.master_eligible.push(node.name.clone());
        }
        if node.has_role(NODE_ROLE_DATA) {
            breakdown.data.push(node.name.clone());
        }
        if node.has_role(NODE_ROLE_INGEST) {
            breakdown.ingest.push(node.name.clone());
        }
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, roles: &[&str], cpu: f64, heap: f64) -> NodeStatsDoc {
        NodeStatsDoc {
            id: id.to_string(),
            name: format!("node-{id}"),
            ip: format!("10.0.0.{}", id.len()),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            cpu_percent: cpu,
            heap_used_percent: heap,
            os_mem_used_percent: 50.0,
            disk_total_bytes: 1000,
            disk_available_bytes: 400,
        }
    }

    #[test]
    fn test_resource_usage_only_counts_data_nodes() {
        let nodes = vec![
            node("a", &["data"], 10.0, 40.0),
            node("b", &["master"], 99.0, 99.0),
            node("c", &["data", "ingest"], 30.0, 60.0),
        ];

        let usage = build_resource_usage(&nodes);
        assert_eq!(usage.node_count, 2);
        assert_eq!(usage.cpu_usage, 20.0);
        assert_eq!(usage.heap_usage, 50.0);
        assert_eq!(usage.cpu_usage_min, 10.0);
        assert_eq!(usage.cpu_usage_max, 30.0);
        assert_eq!(usage.cpu_usage_min_node, "node-a - 10.0.0.1");
        assert_eq!(usage.cpu_usage_max_node, "node-c - 10.0.0.1");
        assert_eq!(usage.heap_usage_max, 60.0);
        assert_eq!(usage.disk_total, 2000);
        assert_eq!(usage.disk_available, 800);
        assert_eq!(usage.memory_usage, 50.0);
    }

    #[test]
    fn test_resource_usage_without_data_nodes() {
        let usage = build_resource_usage(&[node("m", &["master"], 50.0, 50.0)]);
        assert_eq!(usage.node_count, 0);
        assert_eq!(usage.cpu_usage, 0.0);
        assert_eq!(usage.heap_usage, 0.0);
        assert!(usage.cpu_usage_max_node.is_empty());
    }

    #[test]
    fn test_ties_resolve_to_first_node_by_id() {
        let usage = build_resource_usage(&[
            node("a", &["data"], 25.0, 25.0),
            node("b", &["data"], 25.0, 25.0),
        ]);
        assert_eq!(usage.cpu_usage_min_node, "node-a - 10.0.0.1");
        assert_eq!(usage.cpu_usage_max_node, "node-a - 10.0.0.1");
    }

    #[test]
    fn test_shard_state_tally() {
        let shard = |state: &str| CatShardRow {
            state: state.to_string(),
            ..CatShardRow::default()
        };
        let health = build_shard_health(&[
            shard("STARTED"),
            shard("STARTED"),
            shard("UNASSIGNED"),
            shard("RELOCATING"),
            shard("INITIALIZING"),
            shard("weird"),
        ]);

        assert_eq!(health.started_shards, 2);
        assert_eq!(health.unassigned_shards, 1);
        assert_eq!(health.relocating_shards, 1);
        assert_eq!(health.initializing_shards, 1);
    }

    #[test]
    fn test_node_breakdown_roles() {
        let info = |name: &str, roles: &[&str]| NodeInfoDoc {
            id: name.to_string(),
            name: name.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        };
        let breakdown = build_node_breakdown(&[
            info("m1", &["master"]),
            info("d1", &["data", "ingest"]),
            info("d2", &["data", "master"]),
            info("c1", &[]),
        ]);

        assert_eq!(breakdown.total_nodes, 4);
        assert_eq!(breakdown.master_eligible, vec!["m1", "d2"]);
        assert_eq!(breakdown.data, vec!["d1", "d2"]);
        assert_eq!(breakdown.ingest, vec!["d1"]);
        assert_eq!(breakdown.coordinating_only, vec!["c1"]);
    }
}
