//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests call `IntoResponse` directly on `AppError` values; they do not
//! need an HTTP server or a database.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use mes_api::error::AppError;
use mes_core::error::CoreError;
use mes_db::RepoError;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::not_found("Batch", "WO1#1"));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Batch with id WO1#1 not found");
}

#[tokio::test]
async fn illegal_partial_feed_returns_400_bad_request() {
    let err = AppError::Core(CoreError::BadRequest(
        "a collection site can only feed all materials".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "a collection site can only feed all materials");
}

#[tokio::test]
async fn input_errors_have_distinct_codes() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Validation("bad".into()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::InvalidNumber("-1".into()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_NUMBER");
}

#[tokio::test]
async fn conflicts_return_409() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Conflict("dup".into()))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::ResourceExisted("A".into()))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "RESOURCE_EXISTED");
}

#[tokio::test]
async fn lock_contention_returns_423() {
    let err = AppError::from(RepoError::Core(CoreError::LockContention(
        "could not obtain lock on row".into(),
    )));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::LOCKED);
    assert_eq!(json["code"], "LOCK_CONTENTION");
}

#[tokio::test]
async fn missing_operator_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("Missing X-Operator-Id header".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let (status, json) = error_to_response(AppError::Core(CoreError::Internal(
        "locked 1 of 2 resources".into(),
    )))
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");

    let (status, json) = error_to_response(AppError::from(RepoError::Core(
        CoreError::Internal("secret detail".into()),
    )))
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(!json["error"].as_str().unwrap().contains("secret detail"));
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) =
        error_to_response(AppError::from(RepoError::Database(sqlx::Error::RowNotFound))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
