//! Item API Tests
//!
//! Drives the full router in-process:
//! - Create/read round trip and id stability
//! - List count after creates and deletes
//! - Partial update semantics
//! - 404 contract for unknown and malformed ids
//! - Diagnostics independent of store state
//! - Hardened fault responses

use std::fs;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use items_api::http_server::{HttpServer, HttpServerConfig};
use items_api::repository::{ItemStore, MemoryItemRepository};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

// =============================================================================
// Test Utilities
// =============================================================================

fn memory_router() -> Router {
    HttpServer::with_config(
        HttpServerConfig::default(),
        Arc::new(MemoryItemRepository::new()),
    )
    .router()
}

fn detached_router() -> Router {
    HttpServer::with_config(
        HttpServerConfig::default(),
        Arc::new(ItemStore::detached("database at 10.1.2.3 refused connection")),
    )
    .router()
}

async fn send_raw(
    router: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: Body,
) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }

    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = match body {
        Some(body) => {
            send_raw(
                router,
                method,
                uri,
                Some("application/json"),
                Body::from(body.to_string()),
            )
            .await
        }
        None => send_raw(router, method, uri, None, Body::empty()).await,
    };

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send_text(router: &Router, uri: &str) -> (StatusCode, String) {
    let (status, bytes) = send_raw(router, Method::GET, uri, None, Body::empty()).await;
    (status, String::from_utf8(bytes).unwrap())
}

async fn create(router: &Router, body: Value) -> Value {
    let (status, created) = send(router, Method::POST, "/api/items", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    created
}

fn item_uri(item: &Value) -> String {
    format!("/api/items/{}", item["_id"].as_str().unwrap())
}

// =============================================================================
// Create / Read
// =============================================================================

#[tokio::test]
async fn test_create_returns_fields_and_generated_id() {
    let router = memory_router();

    let created = create(&router, json!({"name": "Widget", "price": 12.5, "inStock": true})).await;

    assert_eq!(created["name"], json!("Widget"));
    assert_eq!(created["price"], json!(12.5));
    assert_eq!(created["inStock"], json!(true));
    assert!(!created["_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let router = memory_router();
    let payloads = [
        json!({"name": "Widget", "price": 12.5, "inStock": true}),
        json!({"name": "Refund", "price": -3.0}),
        json!({"inStock": false}),
        json!({}),
    ];

    for payload in payloads {
        let created = create(&router, payload.clone()).await;
        let (status, fetched) = send(&router, Method::GET, &item_uri(&created), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let mut fields = fetched.as_object().unwrap().clone();
        fields.remove("_id");
        assert_eq!(Value::Object(fields), payload);
    }
}

#[tokio::test]
async fn test_create_drops_unknown_fields() {
    let router = memory_router();

    let created = create(&router, json!({"name": "Bolt", "color": "red"})).await;

    assert_eq!(created["name"], json!("Bolt"));
    assert!(created.get("color").is_none());
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn test_list_count_after_creates_and_deletes() {
    let router = memory_router();

    let mut created = Vec::new();
    for i in 0..5 {
        created.push(create(&router, json!({"name": format!("item-{}", i)})).await);
    }
    for item in created.iter().take(2) {
        let (status, _) = send(&router, Method::DELETE, &item_uri(item), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, listed) = send(&router, Method::GET, "/api/items", None).await;
    assert_eq!(status, StatusCode::OK);

    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0]["name"], json!("item-2"));
    assert_eq!(listed[2]["name"], json!("item-4"));
}

#[tokio::test]
async fn test_list_empty() {
    let router = memory_router();
    let (status, listed) = send(&router, Method::GET, "/api/items", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}

// =============================================================================
// Not Found
// =============================================================================

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let router = memory_router();
    let uri = "/api/items/4f1c2a7e-0d1b-4c5e-9a8f-3b2d1e0c9f7a";

    let (status, body) = send(&router, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Item not found"}));

    let (status, body) = send(&router, Method::PUT, uri, Some(json!({"price": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Item not found"}));

    let (status, body) = send(&router, Method::DELETE, uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Item not found"}));
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let router = memory_router();

    for method in [Method::GET, Method::DELETE] {
        let (status, body) = send(&router, method, "/api/items/not-an-id", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Item not found"}));
    }

    let (status, _) = send(
        &router,
        Method::PUT,
        "/api/items/not-an-id",
        Some(json!({"name": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_item_reachable_only_under_its_own_id() {
    let router = memory_router();
    let created = create(&router, json!({"name": "Widget"})).await;
    let id = created["_id"].as_str().unwrap();

    let aliases = [
        id.replace('-', ""),
        format!("%7B{}%7D", id),
        format!("urn:uuid:{}", id),
        id.to_uppercase(),
    ];
    for alias in aliases {
        let uri = format!("/api/items/{}", alias);
        let (status, body) = send(&router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", alias);
        assert_eq!(body, json!({"error": "Item not found"}));
    }

    let (status, body) = send(&router, Method::GET, &item_uri(&created), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_partial_update_changes_only_price() {
    let router = memory_router();
    let created = create(&router, json!({"name": "Widget", "price": 12.5, "inStock": true})).await;
    let uri = item_uri(&created);

    let (status, updated) = send(&router, Method::PUT, &uri, Some(json!({"price": 9.99}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["_id"], created["_id"]);
    assert_eq!(updated["name"], json!("Widget"));
    assert_eq!(updated["price"], json!(9.99));
    assert_eq!(updated["inStock"], json!(true));

    let (_, fetched) = send(&router, Method::GET, &uri, None).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_update_cannot_change_id() {
    let router = memory_router();
    let created = create(&router, json!({"name": "Widget"})).await;

    let (status, updated) = send(
        &router,
        Method::PUT,
        &item_uri(&created),
        Some(json!({"_id": "4f1c2a7e-0d1b-4c5e-9a8f-3b2d1e0c9f7a", "name": "Gadget"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["_id"], created["_id"]);
    assert_eq!(updated["name"], json!("Gadget"));
}

#[tokio::test]
async fn test_update_null_clears_field() {
    let router = memory_router();
    let created = create(&router, json!({"name": "Widget", "inStock": true})).await;

    let (status, updated) = send(
        &router,
        Method::PUT,
        &item_uri(&created),
        Some(json!({"inStock": null})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(updated.get("inStock").is_none());
    assert_eq!(updated["name"], json!("Widget"));
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_twice() {
    let router = memory_router();
    let created = create(&router, json!({"name": "Widget"})).await;
    let uri = item_uri(&created);

    let (status, body) = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Item deleted successfully"}));

    let (status, body) = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Item not found"}));
}

#[tokio::test]
async fn test_widget_lifecycle_scenario() {
    let router = memory_router();

    let created = create(&router, json!({"name": "Widget", "price": 12.5, "inStock": true})).await;
    assert_eq!(created.as_object().unwrap().len(), 4);
    let uri = item_uri(&created);

    let (status, _) = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Item not found"}));
}

// =============================================================================
// Request Body Errors
// =============================================================================

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let router = memory_router();

    let (status, bytes) = send_raw(
        &router,
        Method::POST,
        "/api/items",
        Some("application/json"),
        Body::from("{\"name\": "),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_mistyped_field_is_rejected() {
    let router = memory_router();

    let (status, body) = send(&router, Method::POST, "/api/items", Some(json!({"price": "cheap"}))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    let (_, listed) = send(&router, Method::GET, "/api/items", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_missing_content_type_is_rejected() {
    let router = memory_router();

    let (status, _) = send_raw(
        &router,
        Method::POST,
        "/api/items",
        None,
        Body::from("{\"name\": \"Widget\"}"),
    )
    .await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

// =============================================================================
// Diagnostics and Faults
// =============================================================================

#[tokio::test]
async fn test_ping_and_debug() {
    let router = memory_router();

    assert_eq!(send_text(&router, "/ping").await, (StatusCode::OK, "pong".to_string()));

    let (status, body) = send_text(&router, "/debug").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "🧪 Debug route working");
}

#[tokio::test]
async fn test_health() {
    let router = memory_router();
    let (status, body) = send(&router, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
}

#[tokio::test]
async fn test_ping_works_without_store() {
    let router = detached_router();
    assert_eq!(send_text(&router, "/ping").await, (StatusCode::OK, "pong".to_string()));
}

#[tokio::test]
async fn test_faults_do_not_leak_internal_errors() {
    let router = detached_router();

    let (status, body) = send(&router, Method::GET, "/api/items", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));

    let (status, body) = send(&router, Method::POST, "/api/items", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.to_string().contains("10.1.2.3"));

    let (status, _) = send(&router, Method::GET, "/api/items/not-an-id", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Static Assets
// =============================================================================

#[tokio::test]
async fn test_static_assets_served_at_root() {
    let static_dir = TempDir::new().unwrap();
    fs::write(static_dir.path().join("index.html"), "<h1>Items</h1>").unwrap();

    let config = HttpServerConfig {
        static_dir: static_dir.path().to_path_buf(),
        ..HttpServerConfig::default()
    };
    let router = HttpServer::with_config(config, Arc::new(MemoryItemRepository::new())).router();

    let (status, body) = send_text(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>Items</h1>");

    let (status, _) = send_text(&router, "/missing.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
