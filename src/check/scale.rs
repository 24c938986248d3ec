//! Shard-count recommendations and over/under-scaling detection.
//!
//! Each index gets three independent estimates (size, traffic, document
//! count) combined by a weighted average. Only indices with real size
//! pressure, more than 60 GB per primary shard, are evaluated at all.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::check::models::{
    OverScaledIndex, ScaleWarningType, ScaleWarnings, Severity, ShardRecommendation,
};
use crate::check::system_index::is_system_index;
use crate::core::constants::{
    ACCEPTABLE_RANGE_FLEXIBILITY, BYTES_IN_GB, DOC_COUNT_WEIGHT, HIGH_RATE_THRESHOLD,
    LOW_RATE_THRESHOLD, MAX_ACCEPTABLE_REPLICA_COUNT, MAX_PLAUSIBLE_RATE, MEDIUM_RATE_THRESHOLD,
    MIN_INDEX_SIZE_FOR_CHECK, OPTIMAL_DOCS_PER_SHARD, OPTIMAL_REPLICA_COUNT, SECONDS_PER_DAY,
    SECONDS_PER_HOUR, SIZE_IGNORED_DOC_COUNT_WEIGHT, SIZE_IGNORED_TRAFFIC_WEIGHT, SIZE_WEIGHT,
    TARGET_SHARD_SIZE_GB, TRAFFIC_WEIGHT, VERY_HIGH_RATE_THRESHOLD,
};
use crate::core::Result;
use crate::decode::{node_count, CatIndexRow, IndexStatsDoc};
use crate::source::ClusterDataSource;

/// Estimator weights; every set sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub size: f64,
    pub traffic: f64,
    pub docs: f64,
}

impl Weights {
    pub const DEFAULT: Weights = Weights {
        size: SIZE_WEIGHT,
        traffic: TRAFFIC_WEIGHT,
        docs: DOC_COUNT_WEIGHT,
    };

    pub const SIZE_IGNORED: Weights = Weights {
        size: 0.0,
        traffic: SIZE_IGNORED_TRAFFIC_WEIGHT,
        docs: SIZE_IGNORED_DOC_COUNT_WEIGHT,
    };

    /// Drop the size estimator when shards are already at or under target size.
    pub fn for_layout(index_size: u64, current_shards: usize) -> Self {
        let size_ok = current_shards > 0
            && index_size > 0
            && per_shard_gb(index_size, current_shards) <= TARGET_SHARD_SIZE_GB;
        if size_ok {
            Weights::SIZE_IGNORED
        } else {
            Weights::DEFAULT
        }
    }

    pub fn sum(&self) -> f64 {
        self.size + self.traffic + self.docs
    }
}

/// Search and indexing rates of one index, in operations per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrafficRates {
    pub search: f64,
    pub index: f64,
}

impl TrafficRates {
    pub fn from_stats(stats: &IndexStatsDoc) -> Self {
        Self {
            search: index_traffic_rate(stats.query_total, stats.query_time_millis),
            index: index_traffic_rate(stats.index_total, stats.index_time_millis),
        }
    }

    pub fn combined(&self) -> f64 {
        self.search + self.index
    }
}

/// Evaluates every user index and reports those outside the recommended range.
#[derive(Clone)]
pub struct ShardScalingAdvisor {
    source: Arc<dyn ClusterDataSource>,
}

impl ShardScalingAdvisor {
    pub fn new(source: Arc<dyn ClusterDataSource>) -> Self {
        Self { source }
    }

    /// Fails only when the index listing cannot be fetched. Missing index
    /// stats or node info degrade to zero-valued inputs.
    pub async fn scale_warnings(&self) -> Result<ScaleWarnings> {
        let indices = self
            .source
            .indices()
            .await
            .map_err(|e| e.in_operation("Indices info request"))?;

        let stats = match self.source.index_stats("").await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(error = %e, "Index stats unavailable, evaluating without size data");
                Value::Null
            },
        };

        let nodes = match self.source.nodes().await {
            Ok(nodes) => node_count(&nodes),
            Err(e) => {
                tracing::warn!(error = %e, "Node info unavailable, recommendations are not capped");
                0
            },
        };

        Ok(analyze_scale(
            &CatIndexRow::list(&indices),
            &IndexStatsDoc::list(&stats),
            nodes,
        ))
    }
}

/// Evaluate each index in listing order.
pub fn analyze_scale(indices: &[CatIndexRow], stats: &[IndexStatsDoc], node_count: usize) -> ScaleWarnings {
    let by_name: HashMap<&str, &IndexStatsDoc> = stats.iter().map(|s| (s.name.as_str(), s)).collect();

    let mut warnings = ScaleWarnings::default();
    for index in indices {
        if let Some(finding) = evaluate_index(index, by_name.get(index.index.as_str()).copied(), node_count) {
            tracing::debug!(index = %finding.name, kind = %finding.warning_type, "Scale issue");
            warnings.push(finding);
        }
    }
    warnings
}

/// Produce a finding for one index, or `None` when its layout is acceptable.
pub fn evaluate_index(
    index: &CatIndexRow,
    stats: Option<&IndexStatsDoc>,
    node_count: usize,
) -> Option<OverScaledIndex> {
    let name = index.index.as_str();
    if is_system_index(name) {
        return None;
    }

    let primaries = index.primary_shards;
    let replicas = index.replica_shards;
    let (index_size, doc_count) = stats
        .map(|s| (s.primary_size_bytes, s.primary_doc_count))
        .unwrap_or((0, 0));

    if index_size < MIN_INDEX_SIZE_FOR_CHECK {
        return None;
    }
    if primaries > 0 && per_shard_gb(index_size, primaries) <= TARGET_SHARD_SIZE_GB {
        return None;
    }

    let rates = stats.map(TrafficRates::from_stats).unwrap_or_default();
    let recommendation = recommend(index_size, rates.combined(), doc_count, node_count, primaries);

    let mut finding = None;
    if !recommendation.accepts(primaries) {
        let warning_type = if primaries > recommendation.max_acceptable {
            ScaleWarningType::OverScaled
        } else {
            ScaleWarningType::UnderScaled
        };
        finding = Some((warning_type, scale_message(name, primaries, &recommendation)));
    }

    if finding.is_none() {
        if replicas > MAX_ACCEPTABLE_REPLICA_COUNT {
            finding = Some((
                ScaleWarningType::OverReplicated,
                format!("{name} has {replicas} replicas (optimal: {OPTIMAL_REPLICA_COUNT})"),
            ));
        } else if replicas < 1 {
            finding = Some((
                ScaleWarningType::UnderReplicated,
                format!("{name} has no replicas (optimal: {OPTIMAL_REPLICA_COUNT})"),
            ));
        }
    }

    let (warning_type, warning_message) = finding?;
    Some(OverScaledIndex {
        name: name.to_string(),
        primary_shards: primaries,
        replica_shards: replicas,
        total_shards: primaries * (replicas + 1),
        index_size,
        doc_count,
        search_rate: rates.search,
        index_rate: rates.index,
        warning_type,
        warning_message,
        recommendation,
        severity: Severity::Warning,
    })
}

fn scale_message(name: &str, primaries: usize, rec: &ShardRecommendation) -> String {
    format!(
        "{} has {} primary shards (recommended: {}, acceptable range: {}-{}) [{} confidence] - {}",
        name,
        primaries,
        rec.recommended,
        rec.min_acceptable,
        rec.max_acceptable,
        rec.confidence_level(),
        rec.reasoning
    )
}

/// Hybrid weighted recommendation for one index.
pub fn recommend(
    index_size: u64,
    traffic_rate: f64,
    doc_count: u64,
    node_count: usize,
    current_shards: usize,
) -> ShardRecommendation {
    let size_shards = shards_by_size(index_size, node_count);
    let traffic_shards = shards_by_traffic(traffic_rate);
    let doc_shards = shards_by_doc_count(doc_count);

    let weights = Weights::for_layout(index_size, current_shards);
    let weighted = size_shards as f64 * weights.size
        + traffic_shards as f64 * weights.traffic
        + doc_shards as f64 * weights.docs;

    let mut recommended = (weighted.round() as usize).max(1);
    if node_count > 0 {
        recommended = recommended.min(node_count);
    }

    let min_acceptable =
        ((recommended as f64 * (1.0 - ACCEPTABLE_RANGE_FLEXIBILITY)).ceil() as usize).max(1);
    let max_acceptable = (recommended as f64 * (1.0 + ACCEPTABLE_RANGE_FLEXIBILITY)).floor() as usize;

    ShardRecommendation {
        recommended,
        min_acceptable,
        max_acceptable,
        confidence: confidence(index_size, traffic_rate, doc_count),
        reasoning: reasoning(
            (size_shards, index_size),
            (traffic_shards, traffic_rate),
            (doc_shards, doc_count),
        ),
    }
}

/// One shard per 60 GB, clamped to the node count when it is known.
pub fn shards_by_size(index_size: u64, node_count: usize) -> usize {
    if index_size == 0 {
        return 1;
    }

    let shards = ((bytes_to_gb(index_size) / TARGET_SHARD_SIZE_GB).ceil() as usize).max(1);
    if node_count > 0 {
        shards.min(node_count)
    } else {
        shards
    }
}

pub fn shards_by_traffic(rate: f64) -> usize {
    if rate < LOW_RATE_THRESHOLD {
        1
    } else if rate < MEDIUM_RATE_THRESHOLD {
        2
    } else if rate < HIGH_RATE_THRESHOLD {
        4
    } else if rate < VERY_HIGH_RATE_THRESHOLD {
        8
    } else {
        12
    }
}

pub fn shards_by_doc_count(doc_count: u64) -> usize {
    if doc_count == 0 {
        return 1;
    }
    (doc_count.div_ceil(OPTIMAL_DOCS_PER_SHARD) as usize).max(1)
}

/// 0.5 for size, 0.3 for traffic and 0.2 for documents, each only when non-zero.
pub fn confidence(index_size: u64, traffic_rate: f64, doc_count: u64) -> f64 {
    let mut confidence = 0.0;
    if index_size > 0 {
        confidence += SIZE_WEIGHT;
    }
    if traffic_rate > 0.0 {
        confidence += TRAFFIC_WEIGHT;
    }
    if doc_count > 0 {
        confidence += DOC_COUNT_WEIGHT;
    }
    confidence
}

// Names the strongest available signal only.
fn reasoning(size: (usize, u64), traffic: (usize, f64), docs: (usize, u64)) -> String {
    let (size_shards, index_size) = size;
    let (traffic_shards, rate) = traffic;
    let (doc_shards, doc_count) = docs;

    let reason = if index_size > 0 {
        format!("Size: {:.1}GB→{} shards", bytes_to_gb(index_size), size_shards)
    } else if rate > 0.0 {
        format!("Traffic: {:.1}req/s→{} shards", rate, traffic_shards)
    } else if doc_count > 0 {
        format!("Docs: {}M→{} shards", doc_count / 1_000_000, doc_shards)
    } else {
        return "Minimal data available".to_string();
    };

    format!("Based on {reason}")
}

/// Operations per second from cumulative counters.
///
/// Time counters on freshly created or relocated shards can yield absurd
/// rates; those fall back to a daily average, and a total with no timing
/// data at all falls back to an hourly average.
pub fn index_traffic_rate(total: f64, time_millis: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }

    if time_millis > 0.0 {
        let rate = total / (time_millis / 1000.0);
        if rate < MAX_PLAUSIBLE_RATE {
            rate
        } else {
            total / SECONDS_PER_DAY
        }
    } else {
        total / SECONDS_PER_HOUR
    }
}

fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_IN_GB as f64
}

fn per_shard_gb(index_size: u64, shards: usize) -> f64 {
    bytes_to_gb(index_size) / shards as f64
}
