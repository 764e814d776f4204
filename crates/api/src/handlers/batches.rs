//! Handlers for production batches.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use mes_core::batch::BatchKey;
use mes_core::error::CoreError;
use mes_db::models::batch::{Batch, CreateBatch, UpdateBatch};
use mes_db::models::feed_record::FeedRecord;
use mes_db::repositories::{BatchRepo, FeedRecordRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::operator::Operator;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/batches
pub async fn create_batch(
    operator: Operator,
    State(state): State<AppState>,
    Json(input): Json<CreateBatch>,
) -> AppResult<(StatusCode, Json<DataResponse<Batch>>)> {
    input.validate()?;
    let batch = BatchRepo::create(&state.pool, operator.as_str(), &input).await?;

    tracing::info!(batch = %batch.key(), operator = %operator.0, "Batch created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: batch })))
}

/// GET /api/v1/batches/{work_order}/{number}
pub async fn get_batch(
    State(state): State<AppState>,
    Path((work_order, number)): Path<(String, i16)>,
) -> AppResult<Json<DataResponse<Batch>>> {
    let key = BatchKey::new(work_order, number);
    let batch = find_batch(&state, &key).await?;
    Ok(Json(DataResponse { data: batch }))
}

/// PATCH /api/v1/batches/{work_order}/{number}
pub async fn update_batch(
    operator: Operator,
    State(state): State<AppState>,
    Path((work_order, number)): Path<(String, i16)>,
    Json(input): Json<UpdateBatch>,
) -> AppResult<Json<DataResponse<Batch>>> {
    let key = BatchKey::new(work_order, number);
    let batch = BatchRepo::update(&state.pool, operator.as_str(), &key, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Batch", &key)))?;
    Ok(Json(DataResponse { data: batch }))
}

/// GET /api/v1/batches/{work_order}/{number}/records
///
/// Feed records of a batch, in the order they were appended.
pub async fn list_batch_records(
    State(state): State<AppState>,
    Path((work_order, number)): Path<(String, i16)>,
) -> AppResult<Json<DataResponse<Vec<FeedRecord>>>> {
    let key = BatchKey::new(work_order, number);
    let batch = find_batch(&state, &key).await?;
    let records = FeedRecordRepo::list_by_ids(&state.pool, &batch.records_id).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/work-orders/{work_order}/batches
pub async fn list_work_order_batches(
    State(state): State<AppState>,
    Path(work_order): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Batch>>>> {
    let batches = BatchRepo::list_by_work_order(&state.pool, &work_order).await?;
    Ok(Json(DataResponse { data: batches }))
}

async fn find_batch(state: &AppState, key: &BatchKey) -> AppResult<Batch> {
    BatchRepo::find(&state.pool, key)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Batch", key)))
}
