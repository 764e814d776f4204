//! Handlers for feeding material into production.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use mes_core::error::CoreError;
use mes_core::feed::FeedRequest;
use mes_db::models::feed_record::FeedRecord;
use mes_db::repositories::FeedRecordRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::operator::Operator;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/feeds
///
/// Execute a feed request atomically. Returns the created feed record.
pub async fn create_feed(
    operator: Operator,
    State(state): State<AppState>,
    Json(request): Json<FeedRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<FeedRecord>>)> {
    let record = state
        .feed_engine
        .feed(operator.as_str(), &request)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/feeds/{record_id}
pub async fn get_feed(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> AppResult<Json<DataResponse<FeedRecord>>> {
    let record = FeedRecordRepo::find(&state.pool, &record_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("FeedRecord", &record_id)))?;
    Ok(Json(DataResponse { data: record }))
}
