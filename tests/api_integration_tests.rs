//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use call_cache::{
    api::create_router, cache::CacheOptions, AppState, CacheError, Fetcher, MemoryStore, Result,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

/// Returns "A", then "B", then "C"... one letter per collaborator call.
#[derive(Default)]
struct LetterFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl Fetcher for LetterFetcher {
    async fn fetch(&self, _url: &str) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(((b'A' + n as u8) as char).to_string())
    }
}

struct FailingFetcher;

#[async_trait]
impl Fetcher for FailingFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        Err(CacheError::Fetch(format!("{} is down", url)))
    }
}

async fn create_app_with(fetcher: Arc<dyn Fetcher>, fetch_ttl: Duration) -> Router {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        fetcher,
        fetch_ttl,
        CacheOptions::default(),
    )
    .await
    .unwrap();
    create_router(state)
}

async fn create_test_app() -> Router {
    create_app_with(Arc::new(LetterFetcher::default()), Duration::from_secs(10)).await
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn store(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/store")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

// == STORE / GET Endpoint Tests ==

#[tokio::test]
async fn test_store_then_get_text() {
    let app = create_test_app().await;

    let (status, json) = send(&app, store(r#"{"value":"cat"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let key = json["key"].as_str().unwrap().to_string();

    let (status, json) = send(&app, get(&format!("/get/{}?as=text", key))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"].as_str().unwrap(), key);
    assert_eq!(json["value"].as_str().unwrap(), "cat");

    // Raw reads come back as bytes
    let (_, json) = send(&app, get(&format!("/get/{}", key))).await;
    assert_eq!(json["value"], serde_json::json!([99, 97, 116]));
}

#[tokio::test]
async fn test_store_then_get_integer() {
    let app = create_test_app().await;

    let (_, json) = send(&app, store(r#"{"value":42}"#)).await;
    let key = json["key"].as_str().unwrap().to_string();

    let (status, json) = send(&app, get(&format!("/get/{}?as=integer", key))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"].as_i64().unwrap(), 42);
}

#[tokio::test]
async fn test_get_integer_of_text_is_decode_error() {
    let app = create_test_app().await;

    let (_, json) = send(&app, store(r#"{"value":"not a number"}"#)).await;
    let key = json["key"].as_str().unwrap().to_string();

    let (status, json) = send(&app, get(&format!("/get/{}?as=integer", key))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("not an integer"));
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app().await;

    let (status, json) = send(&app, get("/get/nonexistent_key")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_store_invalid_json() {
    let app = create_test_app().await;

    let response = app.oneshot(store(r#"{"value":"#)).await.unwrap();

    assert!(response.status().is_client_error());
}

// == REPLAY Endpoint Tests ==

#[tokio::test]
async fn test_replay_after_stores() {
    let app = create_test_app().await;

    let (_, first) = send(&app, store(r#"{"value":"foo"}"#)).await;
    let (_, second) = send(&app, store(r#"{"value":1.5}"#)).await;

    let (status, json) = send(&app, get("/replay/store")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["operation"], "Cache.store");
    assert_eq!(json["calls"], 2);

    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["input"], "(\"foo\",)");
    assert_eq!(entries[0]["output"], format!("\"{}\"", first["key"].as_str().unwrap()));
    assert_eq!(entries[1]["input"], "(1.5,)");
    assert_eq!(entries[1]["output"], format!("\"{}\"", second["key"].as_str().unwrap()));
}

#[tokio::test]
async fn test_replay_without_calls() {
    let app = create_test_app().await;

    let (status, json) = send(&app, get("/replay/get")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["calls"], 0);
    assert!(json["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_replay_unknown_operation() {
    let app = create_test_app().await;

    let (status, _) = send(&app, get("/replay/delete")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == FETCH Endpoint Tests ==

#[tokio::test]
async fn test_fetch_within_ttl_is_cached() {
    let app = create_test_app().await;

    let (status, first) = send(&app, get("/fetch?url=http://x")).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = send(&app, get("/fetch?url=http://x")).await;

    assert_eq!(first["payload"], "A");
    assert_eq!(second["payload"], "A");
    assert_eq!(second["access_count"], 2);

    let (_, stats) = send(&app, get("/stats")).await;
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
}

#[tokio::test]
async fn test_fetch_after_ttl_refetches() {
    let app = create_app_with(
        Arc::new(LetterFetcher::default()),
        Duration::from_millis(100),
    )
    .await;

    let (_, first) = send(&app, get("/fetch?url=http://x")).await;
    let (_, second) = send(&app, get("/fetch?url=http://x")).await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    let (_, third) = send(&app, get("/fetch?url=http://x")).await;

    assert_eq!(first["payload"], "A");
    assert_eq!(second["payload"], "A");
    assert_eq!(third["payload"], "B");
    assert_eq!(third["access_count"], 3);
}

#[tokio::test]
async fn test_fetch_failure_is_bad_gateway() {
    let app = create_app_with(Arc::new(FailingFetcher), Duration::from_secs(10)).await;

    let (status, json) = send(&app, get("/fetch?url=http://down")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("is down"));

    let (_, stats) = send(&app, get("/stats")).await;
    assert_eq!(stats["failures"], 1);
}

#[tokio::test]
async fn test_fetch_missing_url_param() {
    let app = create_test_app().await;

    let response = app.oneshot(get("/fetch")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == STATS / HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_stats_counts_calls() {
    let app = create_test_app().await;

    let (_, json) = send(&app, store(r#"{"value":"stats_value"}"#)).await;
    let key = json["key"].as_str().unwrap().to_string();
    send(&app, get(&format!("/get/{}", key))).await;
    send(&app, get("/get/nonexistent")).await;

    let (status, json) = send(&app, get("/stats")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["calls"]["store"], 1);
    assert_eq!(json["calls"]["get"], 2);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app().await;

    let (status, json) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
