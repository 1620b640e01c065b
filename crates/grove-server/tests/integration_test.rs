//! End-to-end integration tests for Grove Server
//!
//! Drives the full router: record listing in both scopes, cursor paging,
//! search, error bodies, and API-key checks.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use grove_common::{GroveError, RecordsConfig, Result};
use grove_document::{Document, DocumentEngine, DocumentPath, Query};
use grove_records::RecordStore;
use grove_server::{create_router, AppState, ServerConfig};

// =============================================================================
// Helpers
// =============================================================================

/// Make a request and return status plus JSON body.
async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    api_key: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

fn config() -> ServerConfig {
    ServerConfig::default().with_records(RecordsConfig::default().with_base_path("orgs/acme"))
}

/// 30 users under `orgs/acme`, 5 under `orgs/beta`, plus stat sources.
fn seeded_store() -> Arc<DocumentEngine> {
    let engine = DocumentEngine::new();
    let mut seed = serde_json::Map::new();
    for i in 1..=30 {
        seed.insert(
            format!("orgs/acme/users/u{i:02}"),
            serde_json::json!({
                "email": format!("user{i:02}@example.com"),
                "displayName": format!("User {i}"),
                "createdAt": format!("2024-01-{i:02}T00:00:00Z"),
            }),
        );
    }
    for i in 1..=5 {
        let source = if i == 3 { "ACME referral" } else { "web" };
        seed.insert(
            format!("orgs/beta/users/b{i}"),
            serde_json::json!({
                "emailAddress": format!("b{i}@beta.io"),
                "createdAt": format!("2023-06-{i:02}"),
                "source": source,
            }),
        );
    }
    seed.insert(
        "orgs/acme/schedules/s1".to_string(),
        serde_json::json!({"participants": ["u30", "b1"]}),
    );
    seed.insert(
        "orgs/acme/users/u30/history/h1".to_string(),
        serde_json::json!({"userId": "u30", "status": "pending"}),
    );
    seed.insert(
        "orgs/acme/users/u30/history/h2".to_string(),
        serde_json::json!({"userId": "u30", "status": "done"}),
    );
    engine.load_json(Value::Object(seed)).unwrap();
    Arc::new(engine)
}

fn app_with(config: ServerConfig, store: Arc<dyn RecordStore>) -> axum::Router {
    create_router(AppState::with_store(config, store).unwrap())
}

fn app() -> axum::Router {
    app_with(config(), seeded_store())
}

fn ids(json: &Value) -> Vec<String> {
    json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

/// Store whose scans always fail.
struct BrokenScans(Arc<DocumentEngine>);

#[async_trait]
impl RecordStore for BrokenScans {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        RecordStore::get(&self.0, path).await
    }

    async fn scan(&self, _query: &Query) -> Result<Vec<Document>> {
        Err(GroveError::Unavailable("connection reset by peer at 10.0.0.7".to_string()))
    }

    async fn count(&self, query: &Query) -> Result<u64> {
        RecordStore::count(&self.0, query).await
    }
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (status, json) = get_json(app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

// =============================================================================
// Records Tests
// =============================================================================

#[tokio::test]
async fn test_default_group_listing() {
    let (status, json) = get_json(app(), "/api/v1/records").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["scope"], "group");
    assert_eq!(json["pageSize"], 25);
    assert_eq!(json["returnedCount"], 25);
    assert_eq!(json["hasMore"], true);
    assert!(json["nextCursor"].is_string());
}

#[tokio::test]
async fn test_single_scope_paging_by_id() {
    let (_, page1) = get_json(app(), "/api/v1/records?scope=single&pageSize=10").await;
    assert_eq!(ids(&page1)[0], "u30");
    assert_eq!(ids(&page1)[9], "u21");
    assert_eq!(page1["hasMore"], true);
    assert_eq!(page1["nextCursor"], "u21");

    let (_, page2) = get_json(app(), "/api/v1/records?scope=single&pageSize=10&cursor=u21").await;
    assert_eq!(ids(&page2)[0], "u20");
    assert_eq!(page2["hasMore"], true);

    let (_, page3) = get_json(app(), "/api/v1/records?scope=single&pageSize=10&pageToken=u11").await;
    assert_eq!(page3["returnedCount"], 10);
    assert_eq!(ids(&page3)[9], "u01");
    assert_eq!(page3["hasMore"], false);
    assert!(page3["nextCursor"].is_null());
}

#[tokio::test]
async fn test_record_shape_and_stats() {
    let (_, json) = get_json(app(), "/api/v1/records?scope=single&pageSize=1").await;
    let record = &json["items"][0];

    assert_eq!(record["id"], "u30");
    assert_eq!(record["email"], "user30@example.com");
    assert_eq!(record["displayName"], "User 30");
    assert_eq!(record["createdAt"], "2024-01-30T00:00:00Z");
    assert_eq!(record["scheduleCount"], 1);
    assert_eq!(record["historyTotal"], 2);
    assert_eq!(record["historyPending"], 1);
    assert!(record["phone"].is_null());
    assert!(record.get("_path").is_none());
}

#[tokio::test]
async fn test_group_cursor_walks_every_record_once() {
    let mut seen = Vec::new();
    let mut uri = "/api/v1/records?sortField=createdAt&sortDir=asc&pageSize=7".to_string();
    loop {
        let (status, json) = get_json(app(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        seen.extend(ids(&json));
        match json["nextCursor"].as_str() {
            Some(cursor) => {
                uri = format!(
                    "/api/v1/records?sortField=createdAt&sortDir=asc&pageSize=7&cursor={cursor}"
                )
            }
            None => break,
        }
    }

    assert_eq!(seen.len(), 35);
    assert_eq!(&seen[..5], &["b1", "b2", "b3", "b4", "b5"]);
    assert_eq!(seen[5], "u01");
    assert_eq!(seen[34], "u30");
}

#[tokio::test]
async fn test_accumulate_all() {
    let (status, json) = get_json(app(), "/api/v1/records?all=1&pageSize=4").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["returnedCount"], 35);
    assert_eq!(json["hasMore"], false);
    assert!(json["nextCursor"].is_null());
}

#[tokio::test]
async fn test_search_filters_fetched_page() {
    let (_, json) = get_json(app(), "/api/v1/records?q=acme&pageSize=100").await;

    assert_eq!(ids(&json), vec!["b3"]);
    assert_eq!(json["returnedCount"], 1);
    assert_eq!(json["hasMore"], false);
}

#[tokio::test]
async fn test_bad_parameters_are_normalized() {
    let (status, json) = get_json(
        app(),
        "/api/v1/records?pageSize=abc&sortField=password&sortDir=sideways&scope=everywhere&cursor=!!!",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pageSize"], 25);
    assert_eq!(json["scope"], "group");
    assert_eq!(json["returnedCount"], 25);

    let (_, json) = get_json(app(), "/api/v1/records?pageSize=5000").await;
    assert_eq!(json["pageSize"], 100);

    let (_, json) = get_json(app(), "/api/v1/records?pageSize=99999999999999999999999").await;
    assert_eq!(json["pageSize"], 100);
}

#[tokio::test]
async fn test_repeated_query_keys_use_first_value() {
    let (status, json) = get_json(app(), "/api/v1/records?q=a&q=b").await;
    assert_eq!(status, StatusCode::OK);
    // every record matches "a" through its email or display name
    assert_eq!(json["returnedCount"], 25);

    let (status, json) = get_json(app(), "/api/v1/records?q=acme&q=zzz&pageSize=100").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), vec!["b3"]);

    let (status, json) = get_json(app(), "/api/v1/records?pageSize=3&pageSize=50&scope=single").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pageSize"], 3);
    assert_eq!(ids(&json), vec!["u30", "u29", "u28"]);
}

#[tokio::test]
async fn test_path_override() {
    let (_, json) = get_json(app(), "/api/v1/records?scope=single&path=orgs/beta/users").await;
    assert_eq!(json["returnedCount"], 5);
    assert_eq!(ids(&json)[0], "b5");
}

// =============================================================================
// Error Tests
// =============================================================================

#[tokio::test]
async fn test_method_not_allowed() {
    let (status, json) = send(app(), "POST", "/api/v1/records", None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["code"], "METHOD_NOT_ALLOWED");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_store_failure_is_opaque_500() {
    let app = app_with(config(), Arc::new(BrokenScans(seeded_store())));
    let (status, json) = get_json(app, "/api/v1/records").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Internal server error");
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(!json.to_string().contains("10.0.0.7"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, json) = get_json(app(), "/api/v1/nothing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

// =============================================================================
// API Key Tests
// =============================================================================

#[tokio::test]
async fn test_api_key_required_when_configured() {
    let keyed = || app_with(config().with_api_keys(vec!["secret".to_string()]), seeded_store());

    let (status, json) = send(keyed(), "GET", "/api/v1/records", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, _) = send(keyed(), "GET", "/api/v1/records", Some("wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = send(keyed(), "GET", "/api/v1/records", Some("secret")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["returnedCount"], 25);

    let (status, _) = send(keyed(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}
