//! HTTP-level tests for the basket endpoints.
//!
//! Flow under test:
//! 1. POST /items stores a basket and answers with the stored state
//! 2. GET /items/:id returns it, or 404 when absent
//! 3. DELETE /items/:id removes it (missing baskets included)

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use basket_store::BasketRepository;
use basket_testkit::{widget_basket, RecordingStore, StoreOperation};
use basketd::{create_router, ApiState, Config, Daemon, ErrorResponse};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

// =============================================================================
// Helpers
// =============================================================================

fn create_app() -> (Arc<RecordingStore>, Router) {
    let store = Arc::new(RecordingStore::new());
    let app = create_router(Arc::new(ApiState::new(store.clone())));
    (store, app)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

fn post_json(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/items")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(id: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/items/{id}"))
        .body(Body::empty())
        .unwrap()
}

fn delete(id: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(format!("/items/{id}"))
        .body(Body::empty())
        .unwrap()
}

fn widget_json(customer_id: &str) -> Value {
    json!({
        "customerID": customer_id,
        "items": [{
            "productID": "p1",
            "productName": "Widget",
            "unitPrice": 9.99,
            "quantity": 2
        }]
    })
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_widget_lifecycle() {
    let (_, app) = create_app();

    // Upsert: 200 with items unchanged
    let (status, body) = send(&app, post_json(&widget_json("c1"))).await;
    assert_eq!(status, StatusCode::OK);
    let stored: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(stored, widget_json("c1"));

    // Fetch: same single item
    let (status, body) = send(&app, get("c1")).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched["items"].as_array().unwrap().len(), 1);
    assert_eq!(fetched, widget_json("c1"));

    // Remove: success with empty body
    let (status, body) = send(&app, delete("c1")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    // Fetch after remove: 404
    let (status, body) = send(&app, get("c1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.code, 404);
    assert_eq!(error.error, "not_found");
}

#[tokio::test]
async fn test_fetch_unknown_id_is_404() {
    let (_, app) = create_app();

    let (status, body) = send(&app, get("unknown-id")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert!(error.message.contains("unknown-id"));
}

#[tokio::test]
async fn test_empty_customer_id_rejected_before_store() {
    let (store, app) = create_app();

    let (status, body) = send(&app, post_json(&widget_json(""))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "validation_error");
    assert!(store.untouched());
}

#[tokio::test]
async fn test_missing_customer_id_rejected_before_store() {
    let (store, app) = create_app();

    let (status, _) = send(&app, post_json(&json!({ "items": [] }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(store.untouched());
}

#[tokio::test]
async fn test_empty_basket_round_trip() {
    let (_, app) = create_app();

    let (status, _) = send(&app, post_json(&json!({ "customerID": "c2", "items": [] }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("c2")).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched, json!({ "customerID": "c2", "items": [] }));
}

#[tokio::test]
async fn test_double_upsert_matches_single() {
    let (_, app) = create_app();

    send(&app, post_json(&widget_json("c1"))).await;
    let (_, once) = send(&app, get("c1")).await;

    send(&app, post_json(&widget_json("c1"))).await;
    let (_, twice) = send(&app, get("c1")).await;

    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_upsert_replaces_items() {
    let (_, app) = create_app();
    send(&app, post_json(&widget_json("c1"))).await;

    let replacement = json!({
        "customerID": "c1",
        "items": [
            { "productID": "p2", "productName": "Gadget", "unitPrice": 3, "quantity": 1 },
            { "productID": "p2", "productName": "Gadget", "unitPrice": 3, "quantity": 1 }
        ]
    });
    let (status, _) = send(&app, post_json(&replacement)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get("c1")).await;
    let fetched: Value = serde_json::from_slice(&body).unwrap();
    let items = fetched["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item["productID"] == "p2"));
}

#[tokio::test]
async fn test_delete_missing_basket_is_ok() {
    let (store, app) = create_app();

    let (status, _) = send(&app, delete("never-written")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.call_count(StoreOperation::Delete), 1);
}

// =============================================================================
// Store failures
// =============================================================================

#[tokio::test]
async fn test_write_failure_is_400_store_error() {
    let (store, app) = create_app();
    store.fail(StoreOperation::Update, "connection refused");

    let (status, body) = send(&app, post_json(&widget_json("c1"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "store_error");
    assert!(error.message.contains("connection refused"));
}

#[tokio::test]
async fn test_confirmation_failure_is_distinct() {
    let (store, app) = create_app();
    store.fail(StoreOperation::Get, "replica lag");

    let (status, body) = send(&app, post_json(&widget_json("c1"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "store_confirmation_error");
    assert!(error.message.contains("replica lag"));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_read_failure_is_400_not_404() {
    let (store, app) = create_app();
    store.fail(StoreOperation::Get, "socket closed");

    let (status, body) = send(&app, get("c1")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "store_error");
}

#[tokio::test]
async fn test_delete_failure_is_400() {
    let (store, app) = create_app();
    store.fail(StoreOperation::Delete, "read-only");

    let (status, _) = send(&app, delete("c1")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stalled_write_answers_with_store_error_body() {
    let store = Arc::new(RecordingStore::new());
    store.hold_writes();
    let mut config = Config::test();
    config.api.request_timeout = Duration::from_millis(50);
    let backend: Arc<dyn BasketRepository> = store.clone();
    let app = Daemon::new(config, backend).router();

    let (status, body) = send(&app, post_json(&widget_json("c1"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.code, 400);
    assert_eq!(error.error, "store_error");
    assert!(error.message.contains("timed out"));
    // The write never completed, so no read-back was attempted.
    assert_eq!(store.calls(), vec![StoreOperation::Update]);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_fixture_matches_wire_scenario() {
    let (_, app) = create_app();
    let payload = serde_json::to_value(widget_basket("c1")).unwrap();

    assert_eq!(payload, widget_json("c1"));

    let (status, _) = send(&app, post_json(&payload)).await;
    assert_eq!(status, StatusCode::OK);
}
