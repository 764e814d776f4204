//! Route definitions for warehouse transfers and stock.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::warehousing;
use crate::state::AppState;

/// Warehouse routes, merged at the API root.
///
/// ```text
/// POST   /warehousing                                             -> transfer
/// GET    /warehouse-stocks/{warehouse_id}/{location}              -> list_location_stock
/// GET    /warehouse-stocks/{warehouse_id}/{location}/{product_id} -> get_stock
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/warehousing", post(warehousing::transfer))
        .route(
            "/warehouse-stocks/{warehouse_id}/{location}",
            get(warehousing::list_location_stock),
        )
        .route(
            "/warehouse-stocks/{warehouse_id}/{location}/{product_id}",
            get(warehousing::get_stock),
        )
}
