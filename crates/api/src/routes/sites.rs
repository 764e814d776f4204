//! Route definitions for sites.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sites;
use crate::state::AppState;

/// Routes mounted at `/sites`.
///
/// ```text
/// POST   /                               -> create_site
/// GET    /{station}/{name}/{index}       -> get_site
/// POST   /{station}/{name}/{index}/bind  -> bind_site
/// POST   /{station}/{name}/{index}/clear -> clear_site
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sites::create_site))
        .route("/{station}/{name}/{index}", get(sites::get_site))
        .route("/{station}/{name}/{index}/bind", post(sites::bind_site))
        .route("/{station}/{name}/{index}/clear", post(sites::clear_site))
}
