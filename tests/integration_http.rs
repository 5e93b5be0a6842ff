//! In-process HTTP integration tests driving the full axum `Router`
//! (spec §8 scenarios S1, S2, S5, S6, plus boundary behaviors), run via
//! `tower::ServiceExt::oneshot` rather than a bound socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use event_store::api::{AppState, RestApiServer};
use event_store::config::Config;
use event_store::consumers::ConsumerRegistry;
use event_store::dispatcher::DispatcherManager;
use event_store::registry::TopicRegistry;
use event_store::store::EventStore;
use event_store::validator::SchemaValidator;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_dir: dir.path().join("data"),
        config_dir: dir.path().join("config"),
        ..Config::default()
    };

    let validator = Arc::new(SchemaValidator::new());
    let topics = Arc::new(TopicRegistry::new(config.config_dir.clone(), validator.clone()));
    let store = Arc::new(EventStore::new(config.data_dir.clone()));
    let consumers = Arc::new(ConsumerRegistry::new());
    let dispatchers = Arc::new(DispatcherManager::new(
        store.clone(),
        consumers.clone(),
        config.delivery_timeout,
        config.dispatch_batch_size,
        config.dispatch_poll_interval,
    ));
    let state = Arc::new(AppState::new(config, topics, validator, store, consumers, dispatchers));
    (RestApiServer::new(state).build_router(), dir)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(v) => Body::from(serde_json::to_vec(&v).unwrap()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn user_created_schema() -> Value {
    json!({
        "eventType": "user.created",
        "type": "object",
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "properties": {"id": {"type": "string"}, "name": {"type": "string"}},
        "required": ["id", "name"],
    })
}

#[tokio::test]
async fn s1_create_publish_read() {
    let (app, _dir) = test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/topics",
        Some(json!({"name": "user-events", "schemas": [user_created_schema()]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/events",
        Some(json!([
            {"topic": "user-events", "type": "user.created", "payload": {"id": "1", "name": "Alice"}}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["eventIds"], json!(["user-events-1"]));

    let (status, body) = send(&app, "GET", "/topics/user-events/events", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"].as_array().unwrap().len(), 1);
    assert_eq!(body["events"][0]["id"], "user-events-1");

    let (status, body) = send(&app, "GET", "/topics/user-events", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sequence"], 1);
}

#[tokio::test]
async fn s2_batch_atomic_validation_rejects_whole_batch() {
    let (app, _dir) = test_app();
    send(
        &app,
        "POST",
        "/topics",
        Some(json!({"name": "user-events", "schemas": [user_created_schema()]})),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        "/events",
        Some(json!([
            {"topic": "user-events", "type": "user.created", "payload": {"id": "1", "name": "A"}},
            {"topic": "user-events", "type": "user.created", "payload": {"id": "2"}}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/topics/user-events", None).await;
    assert_eq!(body["sequence"], 0);

    let (_, body) = send(&app, "GET", "/topics/user-events/events", None).await;
    assert!(body["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn s5_additive_schema_update_allowed_removal_rejected() {
    let (app, _dir) = test_app();
    send(
        &app,
        "POST",
        "/topics",
        Some(json!({"name": "orders", "schemas": [json!({
            "eventType": "order.created",
            "type": "object",
            "$schema": "https://json-schema.org/draft/2020-12/schema",
        })]})),
    )
    .await;

    let (status, _) = send(
        &app,
        "PUT",
        "/topics/orders",
        Some(json!({"schemas": [
            {"eventType": "order.created", "type": "object", "$schema": "https://json-schema.org/draft/2020-12/schema"},
            {"eventType": "order.shipped", "type": "object", "$schema": "https://json-schema.org/draft/2020-12/schema"},
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "PUT",
        "/topics/orders",
        Some(json!({"schemas": [
            {"eventType": "order.shipped", "type": "object", "$schema": "https://json-schema.org/draft/2020-12/schema"},
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn s6_date_filter_restricts_results() {
    let (app, _dir) = test_app();
    send(
        &app,
        "POST",
        "/topics",
        Some(json!({"name": "user-events", "schemas": [user_created_schema()]})),
    )
    .await;
    send(
        &app,
        "POST",
        "/events",
        Some(json!([{"topic": "user-events", "type": "user.created", "payload": {"id": "1", "name": "A"}}])),
    )
    .await;

    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let (status, body) = send(
        &app,
        "GET",
        &format!("/topics/user-events/events?date={today}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "GET",
        "/topics/user-events/events?date=2000-01-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn limit_zero_returns_empty() {
    let (app, _dir) = test_app();
    send(
        &app,
        "POST",
        "/topics",
        Some(json!({"name": "user-events", "schemas": [user_created_schema()]})),
    )
    .await;
    send(
        &app,
        "POST",
        "/events",
        Some(json!([{"topic": "user-events", "type": "user.created", "payload": {"id": "1", "name": "A"}}])),
    )
    .await;

    let (status, body) = send(&app, "GET", "/topics/user-events/events?limit=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn since_event_id_beyond_max_returns_empty() {
    let (app, _dir) = test_app();
    send(
        &app,
        "POST",
        "/topics",
        Some(json!({"name": "user-events", "schemas": [user_created_schema()]})),
    )
    .await;
    send(
        &app,
        "POST",
        "/events",
        Some(json!([{"topic": "user-events", "type": "user.created", "payload": {"id": "1", "name": "A"}}])),
    )
    .await;

    let (status, body) = send(
        &app,
        "GET",
        "/topics/user-events/events?sinceEventId=user-events-999",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn publish_to_unknown_topic_is_404() {
    let (app, _dir) = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/events",
        Some(json!([{"topic": "nope", "type": "x", "payload": {}}])),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TopicNotFound");
}

#[tokio::test]
async fn empty_publish_batch_is_400() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, "POST", "/events", Some(json!([]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "InvalidRequest");
}

#[tokio::test]
async fn register_consumer_rejects_unknown_topic() {
    let (app, _dir) = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/consumers/register",
        Some(json!({"callback": "http://127.0.0.1:1/hook", "topics": {"nope": null}})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TopicNotFound");
}

#[tokio::test]
async fn scoped_routes_isolate_tenants() {
    let (app, _dir) = test_app();
    send(
        &app,
        "POST",
        "/tenants/acme/namespaces/prod/topics",
        Some(json!({"name": "orders", "schemas": [user_created_schema()]})),
    )
    .await;

    let (status, _) = send(&app, "GET", "/topics/orders", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/tenants/acme/namespaces/prod/topics/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "orders");
}
