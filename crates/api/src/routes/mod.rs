pub mod batches;
pub mod feeds;
pub mod health;
pub mod resources;
pub mod sites;
pub mod warehousing;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /feeds                                            feed (POST)
/// /feeds/{record_id}                                feed record
///
/// /resources                                        create or top up (POST)
/// /resources/{resource_id}                          all product types
/// /resources/{resource_id}/{product_type}           get
/// /resources/{resource_id}/{product_type}/split     split (POST)
/// /resources/{resource_id}/{product_type}/status    update status (PUT)
/// /resources/{resource_id}/{product_type}/transports transport history
///
/// /warehousing                                      transfer (POST)
/// /warehouse-stocks/{warehouse}/{location}         stock at a location
/// /warehouse-stocks/{warehouse}/{location}/{product_id}  stock row
///
/// /sites                                            provision (POST)
/// /sites/{station}/{name}/{index}                   get with contents
/// /sites/{station}/{name}/{index}/bind              bind resources (POST)
/// /sites/{station}/{name}/{index}/clear             clear (POST)
///
/// /batches                                          create (POST)
/// /batches/{work_order}/{number}                    get, update (PATCH)
/// /batches/{work_order}/{number}/records            feed records
/// /work-orders/{work_order}/batches                 list batches
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/feeds", feeds::router())
        .nest("/resources", resources::router())
        .merge(warehousing::router())
        .nest("/sites", sites::router())
        .nest("/batches", batches::router())
        .route(
            "/work-orders/{work_order}/batches",
            get(handlers::batches::list_work_order_batches),
        )
}
