mod common;

use apilog_ingest::port::{ApiLogBodyRepository, ApiLogHeadersRepository, ApiLogRepository};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use common::{authed, setup, setup_with_timeout};
use serde_json::{Value, json};
use std::time::Duration;

fn entry(method: &str, path: &str, status: u16) -> Value {
    json!({ "method": method, "path": path, "status_code": status, "response_time_ms": 12 })
}

#[tokio::test]
async fn test_all_entries_stored_returns_created() {
    let (server, stores, project) = setup().await;

    let response = authed(server.post("/api/v1/logs/batch"))
        .json(&json!({ "logs": [entry("GET", "/a", 200), entry("POST", "/b", 201)] }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(
        body,
        json!({ "data": { "success_count": 2, "failed_count": 0, "total": 2 } })
    );

    let logs = stores.logs.inner().all().await;
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|log| log.project_id == project.id));
}

#[tokio::test]
async fn test_missing_method_yields_partial_content() {
    let (server, stores, _) = setup().await;

    let response = authed(server.post("/api/v1/logs/batch"))
        .json(&json!({
            "logs": [
                entry("GET", "/a", 200),
                { "path": "/no-method", "status_code": 200 },
                entry("DELETE", "/c", 204),
            ]
        }))
        .await;

    response.assert_status(StatusCode::PARTIAL_CONTENT);
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["success_count"], 2);
    assert_eq!(data["failed_count"], 1);
    assert_eq!(data["total"], 3);
    assert_eq!(data["errors"], json!(["invalid input: method is required"]));
    assert_eq!(stores.logs.inner().len().await, 2);
}

#[tokio::test]
async fn test_every_entry_invalid_returns_server_error_with_tally() {
    let (server, _, _) = setup().await;

    let response = authed(server.post("/api/v1/logs/batch"))
        .json(&json!({ "logs": [entry("get", "/a", 200), entry("GET", "/b", 700)] }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["failed_count"], 2);
    assert_eq!(data["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_users_creates_then_reuses() {
    let (server, stores, _) = setup().await;
    let with_user = json!({
        "method": "GET", "path": "/me", "status_code": 200,
        "user_identifier": "alice@example.com", "user_name": "Alice"
    });

    authed(server.post("/api/v1/logs/batch"))
        .json(&json!({ "logs": [with_user.clone(), entry("GET", "/anon", 200)], "create_users": true }))
        .await
        .assert_status(StatusCode::CREATED);
    authed(server.post("/api/v1/logs/batch"))
        .json(&json!({ "logs": [with_user], "create_users": true }))
        .await
        .assert_status(StatusCode::CREATED);

    assert_eq!(stores.users.inner().len().await, 1);

    let logs = stores.logs.inner().all().await;
    let user_ids: Vec<_> = logs
        .iter()
        .filter(|log| log.path == "/me")
        .map(|log| log.user_id.clone())
        .collect();
    assert_eq!(user_ids.len(), 2);
    assert!(user_ids[0].is_some());
    assert_eq!(user_ids[0], user_ids[1]);
}

#[tokio::test]
async fn test_user_store_outage_keeps_entry() {
    let (server, stores, _) = setup().await;
    stores.users.set_should_fail(true);

    authed(server.post("/api/v1/logs/batch"))
        .json(&json!({
            "logs": [{ "method": "GET", "path": "/me", "status_code": 200, "user_identifier": "bob" }],
            "create_users": true
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let logs = stores.logs.inner().all().await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].user_id, None);
}

#[tokio::test]
async fn test_body_failure_still_counts_as_success() {
    let (server, stores, _) = setup().await;
    stores.bodies.set_should_fail(true);

    let response = authed(server.post("/api/v1/logs/batch"))
        .json(&json!({
            "logs": [{
                "method": "POST", "path": "/orders", "status_code": 201,
                "request_headers": { "content-type": "application/json" },
                "response_headers": { "x-request-id": "r-1" },
                "request_body": { "sku": "A1" },
                "response_body": { "id": 7 }
            }]
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["data"]["success_count"], 1);

    let log = stores.logs.inner().all().await.remove(0);
    assert!(stores.logs.inner().find_by_id(log.id).await.unwrap().is_some());
    assert!(
        stores
            .headers
            .inner()
            .find_by_log_id(log.id)
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        stores
            .bodies
            .inner()
            .find_by_log_id(log.id)
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(stores.bodies.calls(), 1);
}

#[tokio::test]
async fn test_empty_side_data_writes_no_side_records() {
    let (server, stores, _) = setup().await;

    authed(server.post("/api/v1/logs/batch"))
        .json(&json!({
            "logs": [{
                "method": "GET", "path": "/a", "status_code": 200,
                "request_headers": {}, "request_body": {}, "response_body": null
            }]
        }))
        .await
        .assert_status(StatusCode::CREATED);

    assert_eq!(stores.headers.calls(), 0);
    assert_eq!(stores.bodies.calls(), 0);
}

#[tokio::test]
async fn test_request_metadata_fills_client_fields() {
    let (server, stores, _) = setup().await;

    authed(server.post("/api/v1/logs/batch"))
        .add_header(
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_static("198.51.100.4, 10.0.0.1"),
        )
        .add_header(
            HeaderName::from_static("user-agent"),
            HeaderValue::from_static("apilog-exporter/0.1.0"),
        )
        .json(&json!({
            "logs": [
                entry("GET", "/a", 200),
                { "method": "GET", "path": "/b", "status_code": 200,
                  "ip_address": "192.0.2.1", "user_agent": "browser" }
            ]
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let logs = stores.logs.inner().all().await;
    let a = logs.iter().find(|log| log.path == "/a").unwrap();
    let b = logs.iter().find(|log| log.path == "/b").unwrap();
    assert_eq!(a.ip_address, "198.51.100.4");
    assert_eq!(a.user_agent, "apilog-exporter/0.1.0");
    assert_eq!(b.ip_address, "192.0.2.1");
    assert_eq!(b.user_agent, "browser");
}

#[tokio::test]
async fn test_malformed_batches_are_rejected() {
    let (server, stores, _) = setup().await;

    authed(server.post("/api/v1/logs/batch"))
        .json(&json!({ "logs": [] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    authed(server.post("/api/v1/logs/batch"))
        .json(&json!({ "create_users": true }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = authed(server.post("/api/v1/logs/batch"))
        .add_header(
            HeaderName::from_static("content-type"),
            HeaderValue::from_static("application/json"),
        )
        .text("{not json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());

    assert!(stores.logs.inner().is_empty().await);
}

#[tokio::test]
async fn test_slow_store_hits_request_deadline() {
    let (server, stores, _) = setup_with_timeout(Duration::from_millis(300)).await;
    stores.logs.set_delay(Duration::from_millis(180));

    let response = authed(server.post("/api/v1/logs/batch"))
        .json(&json!({ "logs": [entry("GET", "/a", 200), entry("GET", "/b", 200)] }))
        .await;

    // The first write fits the budget, the second one runs past it.
    response.assert_status(StatusCode::PARTIAL_CONTENT);
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["success_count"], 1);
    assert_eq!(data["errors"], json!(["request deadline exceeded"]));
    assert_eq!(stores.logs.calls(), 2);
    assert_eq!(stores.logs.inner().len().await, 1);
}
