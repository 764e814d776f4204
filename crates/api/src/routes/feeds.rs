//! Route definitions for feeds.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::feeds;
use crate::state::AppState;

/// Routes mounted at `/feeds`.
///
/// ```text
/// POST   /                  -> create_feed
/// GET    /{record_id}       -> get_feed
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(feeds::create_feed))
        .route("/{record_id}", get(feeds::get_feed))
}
