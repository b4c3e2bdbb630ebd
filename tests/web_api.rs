// HTTP API tests — requests go through the real router with the demo
// fixtures behind it.

#![cfg(feature = "web")]

use std::path::Path;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use tastematch::catalog::fixture::FixtureCatalog;
use tastematch::config::Config;
use tastematch::pipeline::compare::Comparator;
use tastematch::web::{build_router, AppState};

fn app() -> axum::Router {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/users.json");
    let mut fixtures: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    // One extra user whose catalog is always down
    fixtures["users"].as_array_mut().unwrap().push(serde_json::json!({
        "profile": {"id": "down", "display_name": "Down"},
        "unavailable": true
    }));
    let catalog = FixtureCatalog::from_json(&fixtures.to_string()).unwrap();

    let config = Config::from_lookup(|_| None).unwrap();
    build_router(AppState {
        comparator: Arc::new(Comparator::new(Arc::new(catalog))),
        config: Arc::new(config),
    })
}

async fn send(method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send("GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn compare_returns_full_result() {
    let (status, body) = send("POST", "/api/compare?user1_id=ana&user2_id=ben").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user1"]["id"], "ana");
    assert_eq!(body["user2"]["id"], "ben");
    assert!(body["similarity_score"].as_u64().unwrap() <= 100);
    assert_eq!(body["shared_tracks"][0]["id"], "hyperballad");
    assert!(!body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn compare_unknown_user_is_404() {
    let (status, body) = send("POST", "/api/compare?user1_id=ana&user2_id=ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["retryable"], false);
    assert!(body["error"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn compare_with_catalog_down_is_503_and_retryable() {
    let (status, body) = send("POST", "/api/compare?user1_id=ana&user2_id=down").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn compare_requires_both_ids() {
    let (status, body) = send("POST", "/api/compare?user1_id=ana").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["retryable"], false);
    assert!(body["error"].as_str().unwrap().contains("user2_id"));

    let (status, body) = send("POST", "/api/compare").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send("POST", "/api/compare?user1_id=ana&user2_id=%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn profile_returns_taste_summary() {
    let (status, body) = send("GET", "/api/user/ben/profile").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_name"], "Ben");
    assert_eq!(body["top_tracks"].as_array().unwrap().len(), 3);
    assert!(body["audio_features"]["tempo"].is_f64());
}

#[tokio::test]
async fn profile_unknown_user_is_404() {
    let (status, _) = send("GET", "/api/user/nobody/profile").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
