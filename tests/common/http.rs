//! In-process requests against an axum router.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

/// Send one request and decode the body as JSON (`Value::Null` when empty)
pub async fn send(router: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");

    let response = router.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be JSON")
    };
    (status, body)
}

pub async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri).await
}

pub async fn post(router: Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::POST, uri).await
}
