//! # Subscription Registration Tests
//!
//! Registering handlers through the registrar and calling them over HTTP.

mod common;

use axum::http::{Method, StatusCode};
use axum_dapr_helper::{
    subscribe, DaprError, RouteKey, RouteTable, Subscribe, SubscriptionDefinition,
    SubscriptionRouter,
};
use common::test_endpoint;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

const TEST_ROUTE: &str = "/test_route";
const TEST_PUBSUB: &str = "test_pubsub";
const TEST_TOPIC: &str = "test_topic";

#[tokio::test]
async fn test_subscribe() {
    let mut app: SubscriptionRouter = SubscriptionRouter::new();
    subscribe(&mut app, TEST_ROUTE, TEST_PUBSUB, TEST_TOPIC, test_endpoint).unwrap();

    let (status, body) = common::post(app.router().clone(), TEST_ROUTE).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "test"}));

    assert_eq!(app.routes().len(), 1);
    let route = &app.routes()[0];
    assert_eq!(route.path, TEST_ROUTE);
    assert_eq!(route.method, Method::POST);

    let extra = app.extra_attributes(&RouteKey::post(TEST_ROUTE)).unwrap();
    assert_eq!(
        extra.get("dapr"),
        Some(&json!({
            "pubsubname": TEST_PUBSUB,
            "topic": TEST_TOPIC,
            "metadata": {}
        }))
    );
}

#[tokio::test]
async fn test_subscribe_with_optional_args() {
    let mut app: SubscriptionRouter = SubscriptionRouter::new();
    let extra: Map<String, Value> = json!({"extra1": "data1"})
        .as_object()
        .cloned()
        .unwrap();

    Subscribe::new(TEST_ROUTE, TEST_PUBSUB, TEST_TOPIC)
        .tags(["tag1", "tag2"])
        .metadata(BTreeMap::from([("meta1".to_string(), "data1".to_string())]))
        .dead_letter_topic("dead_letter")
        .extra(extra)
        .register(&mut app, test_endpoint)
        .unwrap();

    let (status, body) = common::post(app.router().clone(), TEST_ROUTE).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "test"}));

    let route = &app.routes()[0];
    assert_eq!(route.method, Method::POST);
    assert_eq!(route.tags, vec!["tag1".to_string(), "tag2".to_string()]);

    let extra = app.extra_attributes(&RouteKey::post(TEST_ROUTE)).unwrap();
    assert_eq!(
        extra.get("dapr"),
        Some(&json!({
            "pubsubname": TEST_PUBSUB,
            "topic": TEST_TOPIC,
            "metadata": {"meta1": "data1"},
            "deadLetterTopic": "dead_letter"
        }))
    );
    assert_eq!(extra.get("extra1"), Some(&json!("data1")));
}

#[tokio::test]
async fn test_returned_handler_is_the_original() {
    let mut app: SubscriptionRouter = SubscriptionRouter::new();
    let handler = subscribe(&mut app, TEST_ROUTE, TEST_PUBSUB, TEST_TOPIC, test_endpoint).unwrap();

    let axum::Json(body) = handler().await;
    assert_eq!(body, json!({"message": "test"}));
}

#[tokio::test]
async fn test_only_post_is_served() {
    let mut app: SubscriptionRouter = SubscriptionRouter::new();
    subscribe(&mut app, TEST_ROUTE, TEST_PUBSUB, TEST_TOPIC, test_endpoint).unwrap();

    let (status, _) = common::get(app.router().clone(), TEST_ROUTE).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn test_caller_dapr_key_is_overwritten() {
    let mut app: SubscriptionRouter = SubscriptionRouter::new();
    let extra = json!({"dapr": {"pubsubname": "spoofed"}, "owner": "billing"})
        .as_object()
        .cloned()
        .unwrap();

    Subscribe::new("/orders", "orders-pubsub", "new-order")
        .extra(extra)
        .register(&mut app, test_endpoint)
        .unwrap();

    let extra = app.extra_attributes(&RouteKey::post("/orders")).unwrap();
    assert_eq!(extra["dapr"]["pubsubname"], json!("orders-pubsub"));
    assert_eq!(extra["owner"], json!("billing"));
}

#[test]
fn test_invalid_arguments_do_not_touch_the_router() {
    let mut app: SubscriptionRouter = SubscriptionRouter::new();

    let cases = [
        (Subscribe::new("", TEST_PUBSUB, TEST_TOPIC), "path"),
        (Subscribe::new("no-slash", TEST_PUBSUB, TEST_TOPIC), "path"),
        (Subscribe::new(TEST_ROUTE, "", TEST_TOPIC), "pubsub"),
        (Subscribe::new(TEST_ROUTE, TEST_PUBSUB, ""), "topic"),
        (Subscribe::new(TEST_ROUTE, TEST_PUBSUB, TEST_TOPIC).tag(""), "tags"),
        (
            Subscribe::new(TEST_ROUTE, TEST_PUBSUB, TEST_TOPIC).dead_letter_topic(""),
            "dead_letter_topic",
        ),
    ];

    for (subscription, expected_param) in cases {
        match subscription.register(&mut app, test_endpoint) {
            Err(DaprError::TypeMismatch { param, .. }) => assert_eq!(param, expected_param),
            Err(other) => panic!("unexpected error for {expected_param}: {other}"),
            Ok(_) => panic!("registration should fail for {expected_param}"),
        }
    }

    assert!(app.routes().is_empty());
    assert_eq!(app.subscription_count(), 0);
}

#[test]
fn test_non_text_definition_values_are_rejected() {
    let cases = [
        (json!({"path": 1234, "pubsub": "p", "topic": "t"}), "Expected string for \"path\""),
        (json!({"path": "/x", "pubsub": 1234, "topic": "t"}), "Expected string for \"pubsub\""),
        (json!({"path": "/x", "pubsub": "p", "topic": 1234}), "Expected string for \"topic\""),
        (
            json!({"path": "/x", "pubsub": "p", "topic": "t", "tags": "not_a_list"}),
            "Expected list for \"tags\"",
        ),
        (
            json!({"path": "/x", "pubsub": "p", "topic": "t", "dead_letter_topic": 1234}),
            "Expected string for \"dead_letter_topic\"",
        ),
    ];

    for (value, message) in cases {
        let err = SubscriptionDefinition::from_value(&value).unwrap_err();
        assert_eq!(err.to_string(), message);
    }
}

#[test]
fn test_duplicate_subscription_route_is_rejected() {
    let mut app: SubscriptionRouter = SubscriptionRouter::new();
    subscribe(&mut app, TEST_ROUTE, TEST_PUBSUB, TEST_TOPIC, test_endpoint).unwrap();

    let result = subscribe(&mut app, TEST_ROUTE, "other", "other", test_endpoint);
    assert!(matches!(result, Err(DaprError::RouteConflict { .. })));

    // the first registration's descriptor is untouched
    let descriptor = app.subscription(&RouteKey::post(TEST_ROUTE)).unwrap();
    assert_eq!(descriptor.pubsub_name, TEST_PUBSUB);
    assert_eq!(app.routes().len(), 1);
}

#[tokio::test]
async fn test_capture_routes_fail_without_panicking() {
    let mut app: SubscriptionRouter = SubscriptionRouter::new();
    subscribe(&mut app, "/orders/{id}", TEST_PUBSUB, "by-id", test_endpoint).unwrap();

    let clash = subscribe(&mut app, "/orders/{name}", TEST_PUBSUB, "by-name", test_endpoint);
    assert!(matches!(
        clash,
        Err(DaprError::RouteConflict { ref path, .. }) if path == "/orders/{name}"
    ));

    let unbalanced = subscribe(&mut app, "/orders/{id", TEST_PUBSUB, "broken", test_endpoint);
    assert!(matches!(
        unbalanced,
        Err(DaprError::TypeMismatch { param: "path", .. })
    ));

    assert_eq!(app.routes().len(), 1);
    assert_eq!(app.subscription_count(), 1);

    let (status, body) = common::post(app.into_router(), "/orders/42").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "test"}));
}

#[tokio::test]
async fn test_subscribe_with_router_state() {
    use axum::extract::State;

    #[derive(Clone)]
    struct AppState {
        name: &'static str,
    }

    async fn stateful(State(state): State<AppState>) -> String {
        state.name.to_string()
    }

    let mut app: SubscriptionRouter<AppState> = SubscriptionRouter::new();
    subscribe(&mut app, "/stateful", TEST_PUBSUB, TEST_TOPIC, stateful).unwrap();

    let router = app.into_router().with_state(AppState { name: "orders" });
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/stateful")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(router, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"orders");
}
