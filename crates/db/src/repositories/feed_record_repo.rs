//! Repository for the immutable `feed_records` table.

use mes_core::feed::FeedDetail;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::feed_record::FeedRecord;

/// Column list for `feed_records` queries.
const COLUMNS: &str = "id, operator, details, created_at";

pub struct FeedRecordRepo;

impl FeedRecordRepo {
    /// Write a feed record inside the feed transaction.
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        id: &str,
        operator: &str,
        details: &[FeedDetail],
    ) -> Result<FeedRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO feed_records (id, operator, details) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FeedRecord>(&query)
            .bind(id)
            .bind(operator)
            .bind(Json(details))
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn find(pool: &PgPool, id: &str) -> Result<Option<FeedRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM feed_records WHERE id = $1");
        sqlx::query_as::<_, FeedRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch records by ID, in the order the IDs are given.
    pub async fn list_by_ids(
        pool: &PgPool,
        ids: &[String],
    ) -> Result<Vec<FeedRecord>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM feed_records \
             WHERE id = ANY($1) \
             ORDER BY array_position($1, id)"
        );
        sqlx::query_as::<_, FeedRecord>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
