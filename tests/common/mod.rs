//! Common test utilities and fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use escope_lib::core::{EscopeError, Result};
use escope_lib::source::ClusterDataSource;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const GB: u64 = 1024 * 1024 * 1024;

/// Cluster API calls a fake can script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ClusterHealth,
    ClusterStats,
    Nodes,
    NodesStats,
    Shards,
    Indices,
    IndexStats,
}

#[derive(Debug, Clone)]
enum Scripted {
    Respond(Value),
    Fail(String),
    Delay(Duration, Value),
}

/// In-memory [`ClusterDataSource`] with per-endpoint scripted responses.
///
/// Unscripted endpoints fail. Every call is recorded.
#[derive(Debug, Default)]
pub struct FakeDataSource {
    responses: HashMap<Endpoint, Scripted>,
    calls: Mutex<Vec<Endpoint>>,
}

impl FakeDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small healthy three-node cluster with one oversized index.
    pub fn healthy_cluster() -> Self {
        Self::new()
            .respond(Endpoint::ClusterHealth, cluster_health(3))
            .respond(Endpoint::ClusterStats, cluster_stats())
            .respond(Endpoint::Nodes, nodes_info())
            .respond(Endpoint::NodesStats, nodes_stats())
            .respond(Endpoint::Shards, balanced_shards())
            .respond(Endpoint::Indices, cat_indices())
            .respond(Endpoint::IndexStats, index_stats())
    }

    pub fn respond(mut self, endpoint: Endpoint, value: Value) -> Self {
        self.responses.insert(endpoint, Scripted::Respond(value));
        self
    }

    pub fn fail(mut self, endpoint: Endpoint, message: &str) -> Self {
        self.responses
            .insert(endpoint, Scripted::Fail(message.to_string()));
        self
    }

    pub fn delay(mut self, endpoint: Endpoint, delay: Duration, value: Value) -> Self {
        self.responses
            .insert(endpoint, Scripted::Delay(delay, value));
        self
    }

    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == endpoint)
            .count()
    }

    async fn call(&self, endpoint: Endpoint) -> Result<Value> {
        self.calls.lock().unwrap().push(endpoint);
        match self.responses.get(&endpoint).cloned() {
            Some(Scripted::Respond(value)) => Ok(value),
            Some(Scripted::Fail(message)) => {
                Err(EscopeError::data_source(format!("{endpoint:?}"), message))
            },
            Some(Scripted::Delay(delay, value)) => {
                tokio::time::sleep(delay).await;
                Ok(value)
            },
            None => Err(EscopeError::data_source(format!("{endpoint:?}"), "not scripted")),
        }
    }
}

#[async_trait]
impl ClusterDataSource for FakeDataSource {
    async fn cluster_health(&self) -> Result<Value> {
        self.call(Endpoint::ClusterHealth).await
    }

    async fn cluster_stats(&self) -> Result<Value> {
        self.call(Endpoint::ClusterStats).await
    }

    async fn nodes(&self) -> Result<Value> {
        self.call(Endpoint::Nodes).await
    }

    async fn nodes_stats(&self) -> Result<Value> {
        self.call(Endpoint::NodesStats).await
    }

    async fn shards(&self) -> Result<Value> {
        self.call(Endpoint::Shards).await
    }

    async fn indices(&self) -> Result<Value> {
        self.call(Endpoint::Indices).await
    }

    async fn index_stats(&self, _index: &str) -> Result<Value> {
        self.call(Endpoint::IndexStats).await
    }
}

pub fn cluster_health(nodes: u64) -> Value {
    json!({
        "cluster_name": "prod-search",
        "status": "green",
        "number_of_nodes": nodes,
        "number_of_data_nodes": 2,
        "active_primary_shards": 12,
        "active_shards": 24,
        "relocating_shards": 0,
        "initializing_shards": 0,
        "unassigned_shards": 0,
        "delayed_unassigned_shards": 0,
        "number_of_pending_tasks": 0,
        "active_shards_percent_as_number": 100.0
    })
}

pub fn cluster_stats() -> Value {
    json!({
        "indices": {
            "indexing": {"index_total": 5000, "index_time_in_millis": 2500},
            "search": {"query_total": 800, "query_time_in_millis": 400}
        }
    })
}

pub fn nodes_info() -> Value {
    json!({
        "nodes": {
            "n1": {"name": "master-1", "roles": ["master"]},
            "n2": {"name": "data-1", "roles": ["data", "ingest"]},
            "n3": {"name": "data-2", "roles": ["data"]}
        }
    })
}

fn node_stats(name: &str, ip: &str, roles: &[&str], cpu: u64, heap: u64, mem: u64) -> Value {
    json!({
        "name": name,
        "ip": ip,
        "roles": roles,
        "os": {"cpu": {"percent": cpu}, "mem": {"used_percent": mem}},
        "jvm": {"mem": {"heap_used_percent": heap}},
        "fs": {"total": {"total_in_bytes": 1000, "available_in_bytes": 400}}
    })
}

pub fn nodes_stats() -> Value {
    json!({
        "nodes": {
            "n1": node_stats("master-1", "10.0.0.1", &["master"], 99, 99, 99),
            "n2": node_stats("data-1", "10.0.0.2", &["data", "ingest"], 20, 40, 50),
            "n3": node_stats("data-2", "10.0.0.3", &["data"], 60, 70, 70)
        }
    })
}

pub fn balanced_shards() -> Value {
    let mut rows = Vec::new();
    for node in ["data-1", "data-2"] {
        for _ in 0..6 {
            rows.push(json!({"index": "logs", "state": "STARTED", "node": node, "ip": "-"}));
        }
    }
    Value::Array(rows)
}

pub fn cat_indices() -> Value {
    json!([
        {"index": "logs", "health": "green", "status": "open", "pri": "1", "rep": "1",
         "docs.count": "1000", "store.size": "128849018880"},
        {"index": "events", "health": "green", "status": "open", "pri": "2", "rep": "1",
         "docs.count": "10", "store.size": "2048"},
        {"index": ".kibana_1", "health": "green", "status": "open", "pri": "1", "rep": "0",
         "docs.count": "5", "store.size": "1024"}
    ])
}

pub fn index_stats() -> Value {
    json!({
        "indices": {
            "logs": {
                "primaries": {"store": {"size_in_bytes": 120 * GB}, "docs": {"count": 1000}},
                "total": {
                    "store": {"size_in_bytes": 240 * GB},
                    "segments": {"count": 40},
                    "search": {"query_total": 0, "query_time_in_millis": 0},
                    "indexing": {"index_total": 0, "index_time_in_millis": 0}
                }
            },
            "events": {
                "primaries": {"store": {"size_in_bytes": 2048}, "docs": {"count": 10}},
                "total": {"store": {"size_in_bytes": 4096}, "segments": {"count": 4}}
            },
            ".kibana_1": {
                "primaries": {"store": {"size_in_bytes": 1024}},
                "total": {"store": {"size_in_bytes": 2048}, "segments": {"count": 5000}}
            }
        }
    })
}
