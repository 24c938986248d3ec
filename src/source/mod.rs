//! Read-only access to the monitored cluster.
//!
//! The diagnostics depend only on [`ClusterDataSource`]. Each call is one
//! request/response cycle returning a decoded JSON tree; nothing is retried
//! here. Dropping a returned future abandons the request, which is how the
//! per-check timeout cancels it.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::core::Result;

pub mod http;

pub use http::HttpDataSource;

/// Read-only cluster REST operations.
#[async_trait]
pub trait ClusterDataSource: Send + Sync {
    /// `GET /_cluster/health`
    async fn cluster_health(&self) -> Result<Value>;

    /// `GET /_cluster/stats`
    async fn cluster_stats(&self) -> Result<Value>;

    /// `GET /_nodes`
    async fn nodes(&self) -> Result<Value>;

    /// `GET /_nodes/stats`
    async fn nodes_stats(&self) -> Result<Value>;

    /// `GET /_cat/shards` as a JSON array of rows
    async fn shards(&self) -> Result<Value>;

    /// `GET /_cat/indices` as a JSON array of rows
    async fn indices(&self) -> Result<Value>;

    /// `GET /{index}/_stats`; an empty name means all indices
    async fn index_stats(&self, index: &str) -> Result<Value>;
}

#[async_trait]
impl<T: ClusterDataSource + ?Sized> ClusterDataSource for Arc<T> {
    async fn cluster_health(&self) -> Result<Value> {
        (**self).cluster_health().await
    }

    async fn cluster_stats(&self) -> Result<Value> {
        (**self).cluster_stats().await
    }

    async fn nodes(&self) -> Result<Value> {
        (**self).nodes().await
    }

    async fn nodes_stats(&self) -> Result<Value> {
        (**self).nodes_stats().await
    }

    async fn shards(&self) -> Result<Value> {
        (**self).shards().await
    }

    async fn indices(&self) -> Result<Value> {
        (**self).indices().await
    }

    async fn index_stats(&self, index: &str) -> Result<Value> {
        (**self).index_stats(index).await
    }
}
