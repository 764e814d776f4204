//! HTTP-level integration tests for production batches.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_batch, get, patch_json, post_json};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_batch_defaults_to_preparing(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/batches",
        serde_json::json!({ "work_order": "WO1", "number": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let batch = body_json(response).await["data"].clone();
    assert_eq!(batch["status"], 1);
    assert_eq!(batch["updated_by"], common::OPERATOR);
    assert!(batch["records_id"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_batch_is_conflict(pool: PgPool) {
    create_batch(&pool, "WO1", 1).await;

    let response = post_json(
        build_test_app(pool),
        "/api/v1/batches",
        serde_json::json!({ "work_order": "WO1", "number": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_batch_number_must_be_positive(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/batches",
        serde_json::json!({ "work_order": "WO1", "number": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_and_list_batches(pool: PgPool) {
    create_batch(&pool, "WO1", 2).await;
    create_batch(&pool, "WO1", 1).await;
    create_batch(&pool, "WO2", 1).await;

    let response = patch_json(
        build_test_app(pool.clone()),
        "/api/v1/batches/WO1/2",
        serde_json::json!({ "status": 2, "note": "line 3" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let batch = body_json(response).await["data"].clone();
    assert_eq!(batch["status"], 2);
    assert_eq!(batch["note"], "line 3");

    let response = patch_json(
        build_test_app(pool.clone()),
        "/api/v1/batches/WO1/2",
        serde_json::json!({ "status": 99 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(build_test_app(pool.clone()), "/api/v1/work-orders/WO1/batches").await;
    let batches = body_json(response).await["data"].clone();
    let numbers: Vec<i64> = batches
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, [1, 2]);

    let response = get(build_test_app(pool), "/api/v1/batches/WO9/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_batch_records_in_feed_order(pool: PgPool) {
    create_batch(&pool, "WO1", 1).await;

    let mut ids = Vec::new();
    for _ in 0..2 {
        let response = post_json(
            build_test_app(pool.clone()),
            "/api/v1/feeds",
            serde_json::json!({
                "batch": { "work_order": "WO1", "number": 1 },
                "feeds": [{ "kind": "resource_only", "resource": { "resource_id": "GHOST", "product_type": "RUBBER", "quantity": "1" } }],
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        ids.push(body_json(response).await["data"]["id"].clone());
    }

    let response = get(build_test_app(pool), "/api/v1/batches/WO1/1/records").await;
    assert_eq!(response.status(), StatusCode::OK);
    let records = body_json(response).await["data"].clone();
    let listed: Vec<_> = records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].clone())
        .collect();
    assert_eq!(listed, ids);
}
