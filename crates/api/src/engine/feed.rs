//! Feed transaction orchestrator.
//!
//! One feed request runs in one transaction:
//!
//! 1. dispatch every instruction in request order, summing ledger decrements
//!    per resource key;
//! 2. persist the feed record and append it to the batch, if any;
//! 3. lock every decremented resource in one statement (bounded by the
//!    configured lock timeout), then decrement the ledger and the warehouse
//!    stock of placed resources;
//! 4. commit.
//!
//! Any error drops the transaction, which rolls everything back.

use std::time::Duration;

use mes_core::error::CoreError;
use mes_core::feed::{DecrementAccumulator, FeedRequest};
use mes_core::ids;
use mes_core::types::{DbId, Quantity};
use mes_core::warehouse::StockDeltas;
use mes_db::models::feed_record::FeedRecord;
use mes_db::repositories::{BatchRepo, FeedRecordRepo, ResourceRepo, WarehouseStockRepo};
use mes_db::{set_lock_timeout, DbPool, RepoResult};
use sqlx::{Postgres, Transaction};

use super::dispatcher::dispatch;

/// Executes feed requests against the database.
pub struct FeedEngine {
    pool: DbPool,
    lock_timeout: Duration,
}

impl FeedEngine {
    pub fn new(pool: DbPool, lock_timeout: Duration) -> Self {
        Self { pool, lock_timeout }
    }

    /// Execute a feed request atomically and return the persisted record.
    pub async fn feed(&self, operator: &str, request: &FeedRequest) -> RepoResult<FeedRecord> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;
        set_lock_timeout(&mut tx, self.lock_timeout).await?;

        let mut details = Vec::with_capacity(request.feeds.len());
        let mut accumulator = DecrementAccumulator::new();
        for instruction in &request.feeds {
            let dispatched = dispatch(&mut tx, instruction).await?;
            details.push(dispatched.detail);
            accumulator.extend(dispatched.decrements);
        }

        let record_id = ids::new_record_id();
        let record = FeedRecordRepo::insert(&mut tx, &record_id, operator, &details).await?;
        if let Some(batch) = &request.batch {
            if !BatchRepo::append_record(&mut tx, batch, &record_id, operator).await? {
                return Err(CoreError::not_found("Batch", batch).into());
            }
        }

        let decremented = accumulator.len();
        if !accumulator.is_empty() {
            apply_decrements(&mut tx, &record_id, accumulator).await?;
        }

        tx.commit().await?;

        tracing::info!(
            record_id = %record.id,
            batch = ?request.batch.as_ref().map(ToString::to_string),
            details = record.details.0.len(),
            decrements = decremented,
            operator,
            "Feed committed",
        );
        Ok(record)
    }
}

/// Lock and decrement every accumulated resource, and the stock of the
/// placed ones.
async fn apply_decrements(
    tx: &mut Transaction<'_, Postgres>,
    record_id: &str,
    accumulator: DecrementAccumulator,
) -> RepoResult<()> {
    let keys: Vec<_> = accumulator.keys().cloned().collect();
    let locked = ResourceRepo::lock_many(tx, &keys).await?;
    if locked.len() != keys.len() {
        tracing::error!(
            record_id,
            expected = keys.len(),
            locked = locked.len(),
            "Locked resource count does not match the decrement set",
        );
        return Err(CoreError::Internal(format!(
            "locked {} of {} resources referenced by feed {record_id}",
            locked.len(),
            keys.len()
        ))
        .into());
    }

    let mut decrements: Vec<(DbId, Quantity)> = Vec::with_capacity(locked.len());
    let mut deltas = StockDeltas::new();
    for resource in &locked {
        let key = resource.key();
        let amount = accumulator.get(&key).ok_or_else(|| {
            CoreError::Internal(format!("locked resource {key} has no pending decrement"))
        })?;
        if amount > resource.quantity {
            return Err(CoreError::Validation(format!(
                "insufficient quantity of {key}: requested {amount}, available {}",
                resource.quantity
            ))
            .into());
        }
        decrements.push((resource.oid, amount));
        if let Some(placement) = resource.placement()? {
            deltas.add(placement.stock_key(&resource.product_id), -amount);
        }
    }

    ResourceRepo::decrement_many(tx, &decrements, record_id).await?;
    WarehouseStockRepo::apply_deltas(tx, &deltas.without_zeroes()).await?;
    Ok(())
}
