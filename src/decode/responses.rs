//! Typed records for each cluster API response.
//!
//! Every record has a single `from_value` pass that maps absent or
//! mis-typed fields to defaults. Business logic works on these records and
//! never inspects a raw tree.

use serde_json::Value;

use crate::core::constants::*;
use crate::decode::fields::{
    get_count, get_f64, get_object, get_str, get_str_list, get_u64, lookup,
};

/// `GET /_cluster/health`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterHealthDoc {
    pub cluster_name: String,
    pub status: String,
    pub number_of_nodes: usize,
    pub number_of_data_nodes: usize,
    pub active_primary_shards: usize,
    pub active_shards: usize,
    pub unassigned_shards: usize,
    pub relocating_shards: usize,
    pub initializing_shards: usize,
    pub delayed_unassigned_shards: usize,
    pub number_of_pending_tasks: usize,
    pub active_shards_percent: f64,
}

impl ClusterHealthDoc {
    pub fn from_value(value: &Value) -> Self {
        let count = |path: &str| get_u64(value, path) as usize;

        Self {
            cluster_name: get_str(value, CLUSTER_NAME_FIELD),
            status: get_str(value, STATUS_FIELD),
            number_of_nodes: count(NUMBER_OF_NODES_FIELD),
            number_of_data_nodes: count(NUMBER_OF_DATA_NODES_FIELD),
            active_primary_shards: count(ACTIVE_PRIMARY_SHARDS_FIELD),
            active_shards: count(ACTIVE_SHARDS_FIELD),
            unassigned_shards: count(UNASSIGNED_SHARDS_FIELD),
            relocating_shards: count(RELOCATING_SHARDS_FIELD),
            initializing_shards: count(INITIALIZING_SHARDS_FIELD),
            delayed_unassigned_shards: count(DELAYED_UNASSIGNED_SHARDS_FIELD),
            number_of_pending_tasks: count(NUMBER_OF_PENDING_TASKS_FIELD),
            active_shards_percent: get_f64(value, ACTIVE_SHARDS_PERCENT_FIELD),
        }
    }
}

/// One entry of `GET /_nodes/stats`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStatsDoc {
    pub id: String,
    pub name: String,
    pub ip: String,
    pub roles: Vec<String>,
    pub cpu_percent: f64,
    pub heap_used_percent: f64,
    pub os_mem_used_percent: f64,
    pub disk_total_bytes: u64,
    pub disk_available_bytes: u64,
}

impl NodeStatsDoc {
    pub fn from_value(id: &str, node: &Value) -> Self {
        Self {
            id: id.to_owned(),
            name: get_str(node, NAME_FIELD),
            ip: get_str(node, IP_FIELD),
            roles: get_str_list(node, ROLES_FIELD),
            cpu_percent: get_f64(node, &format!("{OS_FIELD}.{CPU_FIELD}.{PERCENT_FIELD}")),
            heap_used_percent: get_f64(
                node,
                &format!("{JVM_FIELD}.{MEM_FIELD}.{HEAP_USED_PERCENT_FIELD}"),
            ),
            os_mem_used_percent: get_f64(
                node,
                &format!("{OS_FIELD}.{MEM_FIELD}.{USED_PERCENT_FIELD}"),
            ),
            disk_total_bytes: get_u64(
                node,
                &format!("{FS_FIELD}.{TOTAL_FIELD}.{TOTAL_IN_BYTES_FIELD}"),
            ),
            disk_available_bytes: get_u64(
                node,
                &format!("{FS_FIELD}.{TOTAL_FIELD}.{AVAILABLE_IN_BYTES_FIELD}"),
            ),
        }
    }

    /// All node entries, ordered by node id.
    pub fn list(response: &Value) -> Vec<Self> {
        node_entries(response)
            .map(|(id, node)| Self::from_value(id, node))
            .collect()
    }

    pub fn is_data_node(&self) -> bool {
        self.roles.iter().any(|role| role == NODE_ROLE_DATA)
    }
}

/// One entry of `GET /_nodes`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeInfoDoc {
    pub id: String,
    pub name: String,
    pub roles: Vec<String>,
}

impl NodeInfoDoc {
    /// All node entries, ordered by node id.
    pub fn list(response: &Value) -> Vec<Self> {
        node_entries(response)
            .map(|(id, node)| Self {
                id: id.to_owned(),
                name: get_str(node, NAME_FIELD),
                roles: get_str_list(node, ROLES_FIELD),
            })
            .collect()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Number of entries in a `nodes` map, or 0 when there is none.
pub fn node_count(response: &Value) -> usize {
    get_object(response, NODES_FIELD).map_or(0, |nodes| nodes.len())
}

// Entries that are not objects are skipped; ids come out sorted so
// min/max attribution is reproducible.
fn node_entries(response: &Value) -> impl Iterator<Item = (&str, &Value)> {
    let mut entries: Vec<(&str, &Value)> = get_object(response, NODES_FIELD)
        .into_iter()
        .flatten()
        .filter(|(_, node)| node.is_object())
        .map(|(id, node)| (id.as_str(), node))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries.into_iter()
}

/// One row of `GET /_cat/shards?format=json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatShardRow {
    pub index: String,
    pub state: String,
    pub node: String,
    pub ip: String,
}

impl CatShardRow {
    pub fn list(response: &Value) -> Vec<Self> {
        cat_rows(response)
            .map(|row| Self {
                index: get_str(row, INDEX_FIELD),
                state: get_str(row, STATE_FIELD),
                node: get_str(row, NODE_FIELD),
                ip: get_str(row, IP_FIELD),
            })
            .collect()
    }

    /// Node the shard lives on: the node column, else the ip column.
    pub fn host_key(&self) -> Option<&str> {
        [self.node.as_str(), self.ip.as_str()]
            .into_iter()
            .find(|key| !key.is_empty() && *key != DASH)
    }
}

/// One row of `GET /_cat/indices?format=json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatIndexRow {
    pub index: String,
    pub health: String,
    pub status: String,
    pub primary_shards: usize,
    pub replica_shards: usize,
    pub docs_count: u64,
    pub store_size: String,
}

impl CatIndexRow {
    pub fn list(response: &Value) -> Vec<Self> {
        cat_rows(response)
            .map(|row| Self {
                index: get_str(row, INDEX_FIELD),
                health: get_str(row, HEALTH_FIELD),
                status: get_str(row, STATUS_FIELD),
                primary_shards: get_count(row, PRIMARY_FIELD) as usize,
                replica_shards: get_count(row, REPLICA_FIELD) as usize,
                docs_count: get_count(row, DOCS_COUNT_FIELD),
                store_size: store_size(row),
            })
            .collect()
    }
}

// `bytes=b` makes the column numeric on some versions
fn store_size(row: &Value) -> String {
    match lookup(row, STORE_SIZE_FIELD) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn cat_rows(response: &Value) -> impl Iterator<Item = &Value> {
    response
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter(|row| row.is_object())
}

/// One entry of `GET /_stats` (or `/{index}/_stats`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexStatsDoc {
    pub name: String,
    pub primary_size_bytes: u64,
    pub primary_doc_count: u64,
    pub total_size_bytes: u64,
    pub segment_count: usize,
    pub query_total: f64,
    pub query_time_millis: f64,
    pub index_total: f64,
    pub index_time_millis: f64,
}

impl IndexStatsDoc {
    pub fn from_value(name: &str, index: &Value) -> Self {
        let primaries = |tail: &str| format!("{PRIMARIES_FIELD}.{tail}");
        let total = |tail: &str| format!("{TOTAL_FIELD}.{tail}");

        Self {
            name: name.to_owned(),
            primary_size_bytes: get_u64(
                index,
                &primaries(&format!("{STORE_FIELD}.{SIZE_IN_BYTES_FIELD}")),
            ),
            primary_doc_count: get_u64(index, &primaries(&format!("{DOCS_FIELD}.{COUNT_FIELD}"))),
            total_size_bytes: get_u64(index, &total(&format!("{STORE_FIELD}.{SIZE_IN_BYTES_FIELD}"))),
            segment_count: get_u64(index, &total(&format!("{SEGMENTS_FIELD}.{COUNT_FIELD}")))
                as usize,
            query_total: get_f64(index, &total(&format!("{SEARCH_FIELD}.{QUERY_TOTAL_FIELD}"))),
            query_time_millis: get_f64(
                index,
                &total(&format!("{SEARCH_FIELD}.{QUERY_TIME_IN_MILLIS_FIELD}")),
            ),
            index_total: get_f64(index, &total(&format!("{INDEXING_FIELD}.{INDEX_TOTAL_FIELD}"))),
            index_time_millis: get_f64(
                index,
                &total(&format!("{INDEXING_FIELD}.{INDEX_TIME_IN_MILLIS_FIELD}")),
            ),
        }
    }

    /// All index entries, ordered by index name.
    pub fn list(response: &Value) -> Vec<Self> {
        let mut docs: Vec<Self> = get_object(response, INDICES_FIELD)
            .into_iter()
            .flatten()
            .filter(|(_, index)| index.is_object())
            .map(|(name, index)| Self::from_value(name, index))
            .collect();
        docs.sort_by(|a, b| a.name.cmp(&b.name));
        docs
    }
}

/// Counters from `GET /_cluster/stats`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterStatsDoc {
    pub index_total: u64,
    pub index_time_millis: u64,
    pub query_total: u64,
    pub query_time_millis: u64,
}

impl ClusterStatsDoc {
    pub fn from_value(value: &Value) -> Self {
        let indices = |tail: String| format!("{INDICES_FIELD}.{tail}");

        Self {
            index_total: get_u64(value, &indices(format!("{INDEXING_FIELD}.{INDEX_TOTAL_FIELD}"))),
            index_time_millis: get_u64(
                value,
                &indices(format!("{INDEXING_FIELD}.{INDEX_TIME_IN_MILLIS_FIELD}")),
            ),
            query_total: get_u64(value, &indices(format!("{SEARCH_FIELD}.{QUERY_TOTAL_FIELD}"))),
            query_time_millis: get_u64(
                value,
                &indices(format!("{SEARCH_FIELD}.{QUERY_TIME_IN_MILLIS_FIELD}")),
            ),
        }
    }
}
