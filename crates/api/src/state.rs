use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::FeedEngine;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: mes_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Executes feed requests.
    pub feed_engine: Arc<FeedEngine>,
}

impl AppState {
    pub fn new(pool: mes_db::DbPool, config: ServerConfig) -> Self {
        let feed_engine = Arc::new(FeedEngine::new(pool.clone(), config.lock_timeout()));
        Self {
            pool,
            config: Arc::new(config),
            feed_engine,
        }
    }
}
