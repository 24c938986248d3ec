//! Defensive decoding of cluster API responses.
//!
//! `fields` reads single values out of untyped trees; `responses` turns each
//! response into a typed record in one pass. Missing data degrades to zero
//! values and never fails a check.

pub mod fields;
pub mod responses;

pub use responses::{
    node_count, CatIndexRow, CatShardRow, ClusterHealthDoc, ClusterStatsDoc, IndexStatsDoc,
    NodeInfoDoc, NodeStatsDoc,
};
