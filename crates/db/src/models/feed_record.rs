//! Feed record model.

use mes_core::feed::FeedDetail;
use mes_core::types::Timestamp;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `feed_records` table. Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeedRecord {
    pub id: String,
    pub operator: String,
    pub details: Json<Vec<FeedDetail>>,
    pub created_at: Timestamp,
}
