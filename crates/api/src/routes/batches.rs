//! Route definitions for production batches.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::batches;
use crate::state::AppState;

/// Routes mounted at `/batches`.
///
/// ```text
/// POST   /                               -> create_batch
/// GET    /{work_order}/{number}          -> get_batch
/// PATCH  /{work_order}/{number}          -> update_batch
/// GET    /{work_order}/{number}/records  -> list_batch_records
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(batches::create_batch))
        .route(
            "/{work_order}/{number}",
            get(batches::get_batch).patch(batches::update_batch),
        )
        .route(
            "/{work_order}/{number}/records",
            get(batches::list_batch_records),
        )
}
