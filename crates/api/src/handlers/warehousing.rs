//! Handlers for warehouse transfers and stock lookup.

use axum::extract::{Path, State};
use axum::Json;
use mes_core::error::CoreError;
use mes_core::warehouse::StockKey;
use mes_db::models::resource::MaterialResource;
use mes_db::models::warehouse::{WarehouseStock, Warehousing};
use mes_db::repositories::WarehouseStockRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::operator::Operator;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/warehousing
///
/// Move a set of resources to one warehouse location. Returns the moved
/// resources.
pub async fn transfer(
    operator: Operator,
    State(state): State<AppState>,
    Json(input): Json<Warehousing>,
) -> AppResult<Json<DataResponse<Vec<MaterialResource>>>> {
    let moved = WarehouseStockRepo::transfer(
        &state.pool,
        operator.as_str(),
        &input,
        state.config.lock_timeout(),
    )
    .await?;
    Ok(Json(DataResponse { data: moved }))
}

/// GET /api/v1/warehouse-stocks/{warehouse_id}/{location}
///
/// Stock of every product held at one location, ordered by product.
pub async fn list_location_stock(
    State(state): State<AppState>,
    Path((warehouse_id, location)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<Vec<WarehouseStock>>>> {
    let stocks = WarehouseStockRepo::list_by_location(&state.pool, &warehouse_id, &location).await?;
    Ok(Json(DataResponse { data: stocks }))
}

/// GET /api/v1/warehouse-stocks/{warehouse_id}/{location}/{product_id}
pub async fn get_stock(
    State(state): State<AppState>,
    Path((warehouse_id, location, product_id)): Path<(String, String, String)>,
) -> AppResult<Json<DataResponse<WarehouseStock>>> {
    let key = StockKey {
        warehouse_id,
        location,
        product_id,
    };
    let stock = WarehouseStockRepo::find(&state.pool, &key)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::not_found(
                "WarehouseStock",
                format!("{}/{}/{}", key.warehouse_id, key.location, key.product_id),
            ))
        })?;
    Ok(Json(DataResponse { data: stock }))
}
