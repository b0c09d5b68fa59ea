//! HTTP surface tests: requests go through the full router in-process.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use stylist_common::{CatalogQuery, RawCatalogItem};
use stylistd::catalog::{CatalogError, CatalogLookup};
use stylistd::metrics::StylistMetrics;
use stylistd::orchestrator::Orchestrator;
use stylistd::server::{app, AppState};
use stylistd::sessions::SessionStore;
use tower::ServiceExt;

/// Two items for every subcategory
struct EchoCatalog;

#[async_trait]
impl CatalogLookup for EchoCatalog {
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<RawCatalogItem>, CatalogError> {
        let sub = query.subcategory.unwrap_or_default();
        Ok((0..2)
            .map(|i| {
                serde_json::from_value(json!({
                    "id": sub * 100 + i,
                    "itemType": "Asset",
                    "subcategory": sub,
                }))
                .unwrap()
            })
            .collect())
    }
}

fn router() -> axum::Router {
    let metrics = Arc::new(StylistMetrics::new().unwrap());
    let orchestrator = Orchestrator::new(Arc::new(EchoCatalog), Arc::new(SessionStore::new()))
        .with_metrics(metrics.clone());
    app(AppState::new(orchestrator, metrics), 64 * 1024)
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_chat_round_trip() {
    let app = router();
    let resp = app
        .clone()
        .oneshot(post_json(
            "/chat",
            json!({ "prompt": "knight outfit under 500", "userId": 77 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["userId"], 77);
    assert_eq!(body["action"], "new_outfit");
    assert_eq!(body["outfit"][0]["type"], "Head");
    assert_eq!(body["outfit"][0]["assetId"], "900");

    // Same user, string form of the id
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/v1/outfit/77")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["outfit"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_malformed_chat_body_gets_failure_json() {
    let resp = router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["action"], "error");
    assert_eq!(body["outfit"], json!([]));
}

#[tokio::test]
async fn test_search_endpoint() {
    let resp = router()
        .oneshot(post_json("/v1/search", json!({ "prompt": "formal look", "limit": 3 })))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_health_and_metrics() {
    let app = router();
    app.clone()
        .oneshot(post_json("/chat", json!({ "prompt": "hello", "userId": "guest" })))
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 1);
    assert_eq!(body["oracle_enabled"], false);

    let resp = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("stylist_turns_total"));
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let metrics = Arc::new(StylistMetrics::new().unwrap());
    let orchestrator = Orchestrator::new(Arc::new(EchoCatalog), Arc::new(SessionStore::new()));
    let app = app(AppState::new(orchestrator, metrics), 64);

    let resp = app
        .oneshot(post_json("/chat", json!({ "prompt": "x".repeat(500) })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
