//! Route definitions for the material resource ledger.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::resources;
use crate::state::AppState;

/// Routes mounted at `/resources`.
///
/// ```text
/// POST   /                                         -> create_resource
/// GET    /{resource_id}                            -> list_by_resource_id
/// GET    /{resource_id}/{product_type}             -> get_resource
/// POST   /{resource_id}/{product_type}/split       -> split_resource
/// PUT    /{resource_id}/{product_type}/status      -> update_status
/// GET    /{resource_id}/{product_type}/transports  -> list_transports
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(resources::create_resource))
        .route("/{resource_id}", get(resources::list_by_resource_id))
        .route("/{resource_id}/{product_type}", get(resources::get_resource))
        .route(
            "/{resource_id}/{product_type}/split",
            post(resources::split_resource),
        )
        .route(
            "/{resource_id}/{product_type}/status",
            put(resources::update_status),
        )
        .route(
            "/{resource_id}/{product_type}/transports",
            get(resources::list_transports),
        )
}
