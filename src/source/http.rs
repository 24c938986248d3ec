//! HTTP adapter for the cluster REST API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::core::config::ConnectionConfig;
use crate::core::{EscopeError, Result};
use crate::source::ClusterDataSource;

/// [`ClusterDataSource`] backed by the cluster's REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl HttpDataSource {
    /// Build a client from connection settings.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url: config.host.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| EscopeError::config(format!("invalid cluster URL '{}': {e}", self.base_url)))
    }

    /// `/{index}/_stats` with the index name encoded as a single path segment.
    fn index_stats_url(&self, index: &str) -> Result<Url> {
        let mut url = self.endpoint("")?;
        url.path_segments_mut()
            .map_err(|_| EscopeError::config(format!("cluster URL '{}' cannot take a path", self.base_url)))?
            .pop_if_empty()
            .push(index)
            .push("_stats");
        Ok(url)
    }

    async fn get_json(&self, operation: &str, url: Url) -> Result<Value> {
        tracing::debug!(%url, operation, "Requesting cluster data");

        let mut request = self.client.get(url);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| EscopeError::data_source(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EscopeError::data_source(operation, describe_status(status, &body)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| EscopeError::data_source(operation, format!("malformed response: {e}")))
    }
}

fn describe_status(status: StatusCode, body: &str) -> String {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("authentication failed ({status})")
        },
        _ if body.is_empty() => format!("unexpected status {status}"),
        _ => format!("unexpected status {status}: {}", truncate(body, 200)),
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl ClusterDataSource for HttpDataSource {
    async fn cluster_health(&self) -> Result<Value> {
        self.get_json("cluster health request", self.endpoint("/_cluster/health")?).await
    }

    async fn cluster_stats(&self) -> Result<Value> {
        self.get_json("cluster stats request", self.endpoint("/_cluster/stats")?).await
    }

    async fn nodes(&self) -> Result<Value> {
        self.get_json("nodes request", self.endpoint("/_nodes")?).await
    }

    async fn nodes_stats(&self) -> Result<Value> {
        self.get_json("nodes stats request", self.endpoint("/_nodes/stats")?).await
    }

    async fn shards(&self) -> Result<Value> {
        self.get_json("shards request", self.endpoint("/_cat/shards?format=json")?).await
    }

    async fn indices(&self) -> Result<Value> {
        self.get_json("indices request", self.endpoint("/_cat/indices?format=json&bytes=b")?)
            .await
    }

    async fn index_stats(&self, index: &str) -> Result<Value> {
        let url = if index.is_empty() {
            self.endpoint("/_stats")?
        } else {
            self.index_stats_url(index)?
        };
        self.get_json("index stats request", url).await
    }
}
