//! HTTP tests of the listener registry

use atclisteners::{create_router, ListenerRegistry};
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn call(router: &Router, method: Method, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri("/api/listeners");
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn router() -> Router {
    create_router(Arc::new(ListenerRegistry::new()))
}

#[tokio::test]
async fn test_heartbeat_count_and_remove() {
    let router = router();

    let (status, json) = call(&router, Method::POST, Some(r#"{"sessionId":"s1"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"success": true, "listeners": 1}));

    let (_, json) = call(&router, Method::POST, Some(r#"{"sessionId":"s2"}"#)).await;
    assert_eq!(json["listeners"], 2);

    let (status, json) = call(&router, Method::GET, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"listeners": 2}));

    let (status, json) = call(&router, Method::DELETE, Some(r#"{"sessionId":"s1"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"success": true, "listeners": 1}));
}

#[tokio::test]
async fn test_heartbeat_without_session_id() {
    let router = router();

    for body in [r#"{}"#, r#"{"sessionId":""}"#, r#"{"sessionId":null}"#] {
        let (status, json) = call(&router, Method::POST, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(json, json!({"error": "Session ID required"}));
    }
}

#[tokio::test]
async fn test_malformed_bodies_are_500() {
    let router = router();

    let (status, json) = call(&router, Method::POST, Some("not json")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to register heartbeat");

    let (status, json) = call(&router, Method::DELETE, Some("{oops")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to remove listener");
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let router = router();
    call(&router, Method::POST, Some(r#"{"sessionId":"s1"}"#)).await;

    for body in [Some(r#"{"sessionId":"ghost"}"#), Some("{}"), None] {
        let (status, json) = call(&router, Method::DELETE, body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"success": true, "listeners": 1}));
    }
}
