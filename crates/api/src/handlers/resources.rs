//! Handlers for the material resource ledger.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use mes_core::error::CoreError;
use mes_core::resource::ResourceKey;
use mes_db::models::resource::{
    CreateResource, MaterialResource, SplitOutcome, SplitResource, UpdateResourceStatus,
};
use mes_db::models::warehouse::TransportRecord;
use mes_db::repositories::{ResourceRepo, TransportRecordRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::operator::Operator;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/resources
///
/// Create a resource, or top up an existing one with the same key and
/// product.
pub async fn create_resource(
    operator: Operator,
    State(state): State<AppState>,
    Json(input): Json<CreateResource>,
) -> AppResult<(StatusCode, Json<DataResponse<MaterialResource>>)> {
    input.validate()?;
    let resource = ResourceRepo::create(&state.pool, operator.as_str(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: resource })))
}

/// GET /api/v1/resources/{resource_id}
///
/// Every product type registered under one resource ID.
pub async fn list_by_resource_id(
    State(state): State<AppState>,
    Path(resource_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<MaterialResource>>>> {
    let resources = ResourceRepo::list_by_resource_id(&state.pool, &resource_id).await?;
    Ok(Json(DataResponse { data: resources }))
}

/// GET /api/v1/resources/{resource_id}/{product_type}
pub async fn get_resource(
    State(state): State<AppState>,
    Path((resource_id, product_type)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<MaterialResource>>> {
    let key = ResourceKey::new(resource_id, product_type);
    let resource = ResourceRepo::find(&state.pool, &key)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("MaterialResource", &key)))?;
    Ok(Json(DataResponse { data: resource }))
}

/// POST /api/v1/resources/{resource_id}/{product_type}/split
pub async fn split_resource(
    operator: Operator,
    State(state): State<AppState>,
    Path((resource_id, product_type)): Path<(String, String)>,
    Json(input): Json<SplitResource>,
) -> AppResult<(StatusCode, Json<DataResponse<SplitOutcome>>)> {
    let key = ResourceKey::new(resource_id, product_type);
    let outcome = ResourceRepo::split(&state.pool, operator.as_str(), &key, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// PUT /api/v1/resources/{resource_id}/{product_type}/status
pub async fn update_status(
    operator: Operator,
    State(state): State<AppState>,
    Path((resource_id, product_type)): Path<(String, String)>,
    Json(input): Json<UpdateResourceStatus>,
) -> AppResult<Json<DataResponse<MaterialResource>>> {
    let key = ResourceKey::new(resource_id, product_type);
    let resource = ResourceRepo::update_status(&state.pool, &key, input.status)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("MaterialResource", &key)))?;

    tracing::info!(
        resource = %key,
        status = input.status,
        operator = %operator.0,
        "Resource status updated",
    );

    Ok(Json(DataResponse { data: resource }))
}

/// GET /api/v1/resources/{resource_id}/{product_type}/transports
pub async fn list_transports(
    State(state): State<AppState>,
    Path((resource_id, product_type)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<Vec<TransportRecord>>>> {
    let key = ResourceKey::new(resource_id, product_type);
    let records = TransportRecordRepo::list_by_resource(&state.pool, &key).await?;
    Ok(Json(DataResponse { data: records }))
}
