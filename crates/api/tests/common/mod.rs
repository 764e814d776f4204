//! Shared helpers for API integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tower::ServiceExt;

use mes_api::config::ServerConfig;
use mes_api::router::build_app_router;
use mes_api::state::AppState;

/// Operator sent on every mutating test request.
pub const OPERATOR: &str = "op-test";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        lock_timeout_ms: 200,
    }
}

/// Build the full application router, exactly as the binary does, over the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState::new(pool, test_config()))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a JSON request carrying the test operator header.
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-operator-id", OPERATOR)
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "POST", uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "PUT", uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "PATCH", uri, body).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a decimal that may be serialized as a string or a number.
pub fn decimal(value: &serde_json::Value) -> Decimal {
    match value {
        serde_json::Value::String(s) => s.parse().unwrap(),
        other => other.to_string().parse().unwrap(),
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_resource(pool: &PgPool, resource_id: &str, quantity: &str) -> serde_json::Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/resources",
        serde_json::json!({
            "resource_id": resource_id,
            "product_type": "RUBBER",
            "product_id": "P-100",
            "grade": "A",
            "quantity": quantity,
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"].clone()
}

pub async fn create_site(pool: &PgPool, name: &str, site_type: &str) {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/sites",
        serde_json::json!({
            "station": "MIXER-1",
            "name": name,
            "index": 0,
            "site_type": site_type,
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
}

pub async fn bind_site(pool: &PgPool, name: &str, resource_ids: &[&str]) {
    let resources: Vec<_> = resource_ids
        .iter()
        .map(|id| serde_json::json!({ "resource_id": id, "product_type": "RUBBER" }))
        .collect();
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/sites/MIXER-1/{name}/0/bind"),
        serde_json::json!({ "resources": resources }),
    )
    .await;
    assert_eq!(response.status(), 200);
}

pub async fn create_batch(pool: &PgPool, work_order: &str, number: i16) {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/batches",
        serde_json::json!({ "work_order": work_order, "number": number }),
    )
    .await;
    assert_eq!(response.status(), 201);
}

pub fn site(name: &str) -> serde_json::Value {
    serde_json::json!({ "station": "MIXER-1", "name": name, "index": 0 })
}
