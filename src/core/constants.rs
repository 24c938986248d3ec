//! Fixed field names, thresholds and message templates.
//!
//! Everything that tunes the diagnostics lives here so the analyzers stay
//! pure functions of their explicit inputs.

/// Default sampling interval for continuous monitoring
pub const DEFAULT_INTERVAL_SECS: u64 = 2;
/// Default per-check timeout
pub const DEFAULT_CHECK_TIMEOUT_SECS: u64 = 5;

pub const SEVERITY_CRITICAL: &str = "CRITICAL";
pub const SEVERITY_WARNING: &str = "WARNING";

// Cluster health response
pub const CLUSTER_NAME_FIELD: &str = "cluster_name";
pub const STATUS_FIELD: &str = "status";
pub const NUMBER_OF_NODES_FIELD: &str = "number_of_nodes";
pub const NUMBER_OF_DATA_NODES_FIELD: &str = "number_of_data_nodes";
pub const ACTIVE_PRIMARY_SHARDS_FIELD: &str = "active_primary_shards";
pub const ACTIVE_SHARDS_FIELD: &str = "active_shards";
pub const UNASSIGNED_SHARDS_FIELD: &str = "unassigned_shards";
pub const RELOCATING_SHARDS_FIELD: &str = "relocating_shards";
pub const INITIALIZING_SHARDS_FIELD: &str = "initializing_shards";
pub const DELAYED_UNASSIGNED_SHARDS_FIELD: &str = "delayed_unassigned_shards";
pub const NUMBER_OF_PENDING_TASKS_FIELD: &str = "number_of_pending_tasks";
pub const ACTIVE_SHARDS_PERCENT_FIELD: &str = "active_shards_percent_as_number";

// Node info and node stats
pub const NODES_FIELD: &str = "nodes";
pub const NAME_FIELD: &str = "name";
pub const IP_FIELD: &str = "ip";
pub const ROLES_FIELD: &str = "roles";
pub const OS_FIELD: &str = "os";
pub const CPU_FIELD: &str = "cpu";
pub const PERCENT_FIELD: &str = "percent";
pub const MEM_FIELD: &str = "mem";
pub const USED_PERCENT_FIELD: &str = "used_percent";
pub const JVM_FIELD: &str = "jvm";
pub const HEAP_USED_PERCENT_FIELD: &str = "heap_used_percent";
pub const FS_FIELD: &str = "fs";
pub const TOTAL_FIELD: &str = "total";
pub const TOTAL_IN_BYTES_FIELD: &str = "total_in_bytes";
pub const AVAILABLE_IN_BYTES_FIELD: &str = "available_in_bytes";

pub const NODE_ROLE_DATA: &str = "data";
pub const NODE_ROLE_MASTER: &str = "master";
pub const NODE_ROLE_INGEST: &str = "ingest";

// Cluster stats and index stats
pub const INDICES_FIELD: &str = "indices";
pub const PRIMARIES_FIELD: &str = "primaries";
pub const INDEXING_FIELD: &str = "indexing";
pub const SEARCH_FIELD: &str = "search";
pub const INDEX_TOTAL_FIELD: &str = "index_total";
pub const INDEX_TIME_IN_MILLIS_FIELD: &str = "index_time_in_millis";
pub const QUERY_TOTAL_FIELD: &str = "query_total";
pub const QUERY_TIME_IN_MILLIS_FIELD: &str = "query_time_in_millis";
pub const SEGMENTS_FIELD: &str = "segments";
pub const COUNT_FIELD: &str = "count";
pub const STORE_FIELD: &str = "store";
pub const SIZE_IN_BYTES_FIELD: &str = "size_in_bytes";
pub const DOCS_FIELD: &str = "docs";

// _cat/shards and _cat/indices rows
pub const INDEX_FIELD: &str = "index";
pub const STATE_FIELD: &str = "state";
pub const NODE_FIELD: &str = "node";
pub const HEALTH_FIELD: &str = "health";
pub const DOCS_COUNT_FIELD: &str = "docs.count";
pub const STORE_SIZE_FIELD: &str = "store.size";
pub const PRIMARY_FIELD: &str = "pri";
pub const REPLICA_FIELD: &str = "rep";

pub const SHARD_STATE_STARTED: &str = "STARTED";
pub const SHARD_STATE_INITIALIZING: &str = "INITIALIZING";
pub const SHARD_STATE_RELOCATING: &str = "RELOCATING";
pub const SHARD_STATE_UNASSIGNED: &str = "UNASSIGNED";

pub const DASH: &str = "-";

// Balance and segment thresholds
pub const BALANCE_RATIO_THRESHOLD: f64 = 0.7;
pub const BASE_SEGMENT_THRESHOLD: usize = 1000;
pub const SMALL_SEGMENT_THRESHOLD: u64 = BYTES_IN_MB;
pub const LARGE_SEGMENT_THRESHOLD: u64 = BYTES_IN_GB;
pub const BASE_CPU_THRESHOLD: f64 = 80.0;
pub const MAX_CPU_THRESHOLD: f64 = 95.0;
pub const BASE_MEMORY_THRESHOLD: f64 = 90.0;
pub const MAX_MEMORY_THRESHOLD: f64 = 98.0;
pub const BASE_HEAP_THRESHOLD: f64 = 85.0;
pub const MAX_HEAP_THRESHOLD: f64 = 95.0;
pub const HIGH_DISK_THRESHOLD: f64 = 90.0;

// Replica thresholds
pub const OPTIMAL_REPLICA_COUNT: usize = 2;
pub const MAX_ACCEPTABLE_REPLICA_COUNT: usize = 3;

// Request-rate steps for the traffic estimator (req/s)
pub const LOW_RATE_THRESHOLD: f64 = 10.0;
pub const MEDIUM_RATE_THRESHOLD: f64 = 100.0;
pub const HIGH_RATE_THRESHOLD: f64 = 1000.0;
pub const VERY_HIGH_RATE_THRESHOLD: f64 = 5000.0;

/// Upper bound on a believable per-index rate derived from time counters
pub const MAX_PLAUSIBLE_RATE: f64 = 1_000_000.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const SECONDS_PER_HOUR: f64 = 3_600.0;

pub const OPTIMAL_DOCS_PER_SHARD: u64 = 10_000_000;
pub const TARGET_SHARD_SIZE_GB: f64 = 60.0;

// Hybrid recommendation weights, each set sums to 1.0
pub const SIZE_WEIGHT: f64 = 0.5;
pub const TRAFFIC_WEIGHT: f64 = 0.3;
pub const DOC_COUNT_WEIGHT: f64 = 0.2;
pub const SIZE_IGNORED_TRAFFIC_WEIGHT: f64 = 0.6;
pub const SIZE_IGNORED_DOC_COUNT_WEIGHT: f64 = 0.4;

/// Acceptable deviation from the recommendation (±40%)
pub const ACCEPTABLE_RANGE_FLEXIBILITY: f64 = 0.4;

pub const HIGH_CONFIDENCE: f64 = 0.8;
pub const MEDIUM_CONFIDENCE: f64 = 0.5;

pub const MIN_INDEX_SIZE_FOR_CHECK: u64 = BYTES_IN_GB;

pub const BYTES_IN_MB: u64 = 1024 * 1024;
pub const BYTES_IN_GB: u64 = 1024 * 1024 * 1024;

pub const WARNING_TYPE_OVER_SCALED: &str = "over-scaled";
pub const WARNING_TYPE_UNDER_SCALED: &str = "under-scaled";
pub const WARNING_TYPE_OVER_REPLICATED: &str = "over-replicated";
pub const WARNING_TYPE_UNDER_REPLICATED: &str = "under-replicated";

/// Name prefixes of internal indices that may appear without a leading dot
pub const SYSTEM_INDEX_PREFIXES: &[&str] = &[
    "kibana",
    "apm",
    "security",
    "monitoring",
    "watcher",
    "ilm",
    "slm",
    "transform",
];

pub const MSG_TIMEOUT_GENERIC: &str = "operation timed out";
pub const MSG_SHARD_HEALTHY: &str = "Shard distribution looks healthy";
pub const MSG_CONSIDER_REBALANCING: &str =
    "Consider rebalancing shards across nodes (check allocation filters and disk watermarks)";
