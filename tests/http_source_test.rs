//! HTTP adapter against a mock cluster.

mod common;

use escope_lib::check::run_full_check;
use escope_lib::core::config::ConnectionConfig;
use escope_lib::core::{DynamicThresholds, EscopeError};
use escope_lib::source::{ClusterDataSource, HttpDataSource};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connection(server: &MockServer) -> ConnectionConfig {
    ConnectionConfig {
        host: server.uri(),
        ..ConnectionConfig::default()
    }
}

async fn mount_json(server: &MockServer, endpoint: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_cluster_health_request() {
    let server = MockServer::start().await;
    mount_json(&server, "/_cluster/health", common::cluster_health(5)).await;

    let source = HttpDataSource::new(&connection(&server)).unwrap();
    let health = source.cluster_health().await.unwrap();
    assert_eq!(health["number_of_nodes"], 5);

    let thresholds = DynamicThresholds::from_cluster(&source).await.unwrap();
    assert_eq!(thresholds, DynamicThresholds::for_node_count(5));
}

#[tokio::test]
async fn test_basic_auth_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_nodes"))
        .and(basic_auth("monitor", "hunter2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::nodes_info()))
        .expect(1)
        .mount(&server)
        .await;

    let config = ConnectionConfig {
        username: Some("monitor".to_string()),
        password: Some("hunter2".to_string()),
        ..connection(&server)
    };
    let source = HttpDataSource::new(&config).unwrap();
    let nodes = source.nodes().await.unwrap();
    assert_eq!(nodes["nodes"].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_cat_endpoints_request_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_cat/indices"))
        .and(query_param("format", "json"))
        .and(query_param("bytes", "b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::cat_indices()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_cat/shards"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::balanced_shards()))
        .mount(&server)
        .await;

    let source = HttpDataSource::new(&connection(&server)).unwrap();
    assert_eq!(source.indices().await.unwrap().as_array().unwrap().len(), 3);
    assert_eq!(source.shards().await.unwrap().as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_index_stats_paths() {
    let server = MockServer::start().await;
    mount_json(&server, "/_stats", common::index_stats()).await;
    mount_json(&server, "/logs/_stats", serde_json::json!({"indices": {"logs": {}}})).await;

    let source = HttpDataSource::new(&connection(&server)).unwrap();
    let all = source.index_stats("").await.unwrap();
    assert_eq!(all["indices"].as_object().unwrap().len(), 3);

    let one = source.index_stats("logs").await.unwrap();
    assert_eq!(one["indices"].as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn test_index_name_with_reserved_characters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/audit%232024%3Fq/_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"indices": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpDataSource::new(&connection(&server)).unwrap();
    let stats = source.index_stats("audit#2024?q").await.unwrap();
    assert!(stats["indices"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_error_status_names_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_cluster/stats"))
        .respond_with(ResponseTemplate::new(503).set_body_string("master_not_discovered"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_nodes/stats"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let source = HttpDataSource::new(&connection(&server)).unwrap();

    let err = source.cluster_stats().await.unwrap_err();
    assert!(matches!(err, EscopeError::DataSource { .. }));
    let message = err.to_string();
    assert!(message.starts_with("cluster stats request failed"), "{message}");
    assert!(message.contains("master_not_discovered"));

    let err = source.nodes_stats().await.unwrap_err();
    assert!(err.to_string().contains("authentication failed"));
}

#[tokio::test]
async fn test_malformed_body_is_a_data_source_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_cluster/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let source = HttpDataSource::new(&connection(&server)).unwrap();
    let err = source.cluster_health().await.unwrap_err();
    assert!(err.to_string().contains("malformed response"));
}

#[tokio::test]
async fn test_full_check_over_http() {
    let server = MockServer::start().await;
    mount_json(&server, "/_cluster/health", common::cluster_health(3)).await;
    mount_json(&server, "/_cluster/stats", common::cluster_stats()).await;
    mount_json(&server, "/_nodes", common::nodes_info()).await;
    mount_json(&server, "/_nodes/stats", common::nodes_stats()).await;
    mount_json(&server, "/_cat/shards", common::balanced_shards()).await;
    mount_json(&server, "/_cat/indices", common::cat_indices()).await;
    mount_json(&server, "/_stats", common::index_stats()).await;

    let source = Arc::new(HttpDataSource::new(&connection(&server)).unwrap());
    let report = run_full_check(source, Duration::from_secs(5)).await;

    assert!(report.is_complete(), "unexpected failures: {:?}", report.failures());
    let names: Vec<&str> = report
        .indices
        .as_ref()
        .unwrap()
        .iter()
        .map(|index| index.name.as_str())
        .collect();
    assert_eq!(names, vec!["logs", "events", ".kibana_1"]);
    assert_eq!(report.scale_warnings.as_ref().unwrap().over_scaled_indices.len(), 1);
}
