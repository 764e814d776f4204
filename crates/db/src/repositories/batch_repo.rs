//! Repository for the `batches` table.

use mes_core::batch::{validate_batch_status, BatchKey};
use mes_core::error::CoreError;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{is_unique_violation, RepoError, RepoResult};
use crate::models::batch::{Batch, CreateBatch, UpdateBatch};
use crate::models::status::BatchStatus;

/// Column list for `batches` queries.
const COLUMNS: &str = "\
    id, work_order, number, status, note, records_id, updated_by, \
    created_at, updated_at";

pub struct BatchRepo;

impl BatchRepo {
    /// Insert a new batch, returning the created row.
    pub async fn create(pool: &PgPool, operator: &str, input: &CreateBatch) -> RepoResult<Batch> {
        let key = BatchKey::new(&input.work_order, input.number);
        key.validate()?;
        let status = input.status.unwrap_or(BatchStatus::Preparing.id());
        validate_batch_status(status)?;

        let query = format!(
            "INSERT INTO batches (work_order, number, status, note, updated_by) \
             VALUES ($1, $2, $3, COALESCE($4, ''), $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Batch>(&query)
            .bind(&input.work_order)
            .bind(input.number)
            .bind(status)
            .bind(&input.note)
            .bind(operator)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, "uq_batches_work_order_number") {
                    RepoError::from(CoreError::Conflict(format!("batch {key} already exists")))
                } else {
                    RepoError::from(e)
                }
            })
    }

    /// Find a batch by work order and number.
    pub async fn find(pool: &PgPool, key: &BatchKey) -> Result<Option<Batch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM batches WHERE work_order = $1 AND number = $2");
        sqlx::query_as::<_, Batch>(&query)
            .bind(&key.work_order)
            .bind(key.number)
            .fetch_optional(pool)
            .await
    }

    /// List a work order's batches in number order.
    pub async fn list_by_work_order(
        pool: &PgPool,
        work_order: &str,
    ) -> Result<Vec<Batch>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM batches WHERE work_order = $1 ORDER BY number");
        sqlx::query_as::<_, Batch>(&query)
            .bind(work_order)
            .fetch_all(pool)
            .await
    }

    /// Update a batch. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        operator: &str,
        key: &BatchKey,
        input: &UpdateBatch,
    ) -> RepoResult<Option<Batch>> {
        if let Some(status) = input.status {
            validate_batch_status(status)?;
        }
        let query = format!(
            "UPDATE batches SET \
                status = COALESCE($3, status), \
                note = COALESCE($4, note), \
                updated_by = $5, \
                updated_at = NOW() \
             WHERE work_order = $1 AND number = $2 \
             RETURNING {COLUMNS}"
        );
        let batch = sqlx::query_as::<_, Batch>(&query)
            .bind(&key.work_order)
            .bind(key.number)
            .bind(input.status)
            .bind(&input.note)
            .bind(operator)
            .fetch_optional(pool)
            .await?;
        Ok(batch)
    }

    /// Append a feed record ID to a batch. Returns `false` if the batch does
    /// not exist.
    pub async fn append_record(
        tx: &mut Transaction<'_, Postgres>,
        key: &BatchKey,
        record_id: &str,
        operator: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE batches \
             SET records_id = array_append(records_id, $3), \
                 updated_by = $4, \
                 updated_at = NOW() \
             WHERE work_order = $1 AND number = $2",
        )
        .bind(&key.work_order)
        .bind(key.number)
        .bind(record_id)
        .bind(operator)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
