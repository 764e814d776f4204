//! Repository for the `warehouse_stocks` aggregate and resource transfers.

use std::collections::BTreeSet;
use std::time::Duration;

use mes_core::error::CoreError;
use mes_core::resource::ResourceKey;
use mes_core::types::{DbId, Quantity};
use mes_core::warehouse::{
    transfer_deltas, StockDeltas, StockKey, TransferItem, WarehouseLocation,
};
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::RepoResult;
use crate::models::resource::MaterialResource;
use crate::models::warehouse::{WarehouseStock, Warehousing};
use crate::repositories::{ResourceRepo, TransportRecordRepo};
use crate::set_lock_timeout;

/// Column list for `warehouse_stocks` queries.
const COLUMNS: &str = "warehouse_id, location, product_id, quantity, updated_at";

/// Maintains per-location stock totals. Rows are created on first movement
/// and only ever adjusted additively.
pub struct WarehouseStockRepo;

impl WarehouseStockRepo {
    /// Add every delta in one upsert.
    pub async fn apply_deltas(
        tx: &mut Transaction<'_, Postgres>,
        deltas: &StockDeltas,
    ) -> Result<(), sqlx::Error> {
        if deltas.is_empty() {
            return Ok(());
        }

        let mut warehouses = Vec::with_capacity(deltas.len());
        let mut locations = Vec::with_capacity(deltas.len());
        let mut products = Vec::with_capacity(deltas.len());
        let mut quantities: Vec<Quantity> = Vec::with_capacity(deltas.len());
        for (key, delta) in deltas.iter() {
            warehouses.push(key.warehouse_id.clone());
            locations.push(key.location.clone());
            products.push(key.product_id.clone());
            quantities.push(*delta);
        }

        sqlx::query(
            "INSERT INTO warehouse_stocks (warehouse_id, location, product_id, quantity) \
             SELECT * FROM UNNEST($1::text[], $2::text[], $3::text[], $4::numeric[]) \
             ON CONFLICT (warehouse_id, location, product_id) DO UPDATE \
             SET quantity = warehouse_stocks.quantity + EXCLUDED.quantity, \
                 updated_at = NOW()",
        )
        .bind(&warehouses)
        .bind(&locations)
        .bind(&products)
        .bind(&quantities)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Find the stock row for one key.
    pub async fn find(pool: &PgPool, key: &StockKey) -> Result<Option<WarehouseStock>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM warehouse_stocks \
             WHERE warehouse_id = $1 AND location = $2 AND product_id = $3"
        );
        sqlx::query_as::<_, WarehouseStock>(&query)
            .bind(&key.warehouse_id)
            .bind(&key.location)
            .bind(&key.product_id)
            .fetch_optional(pool)
            .await
    }

    /// List every product's stock at one location.
    pub async fn list_by_location(
        pool: &PgPool,
        warehouse_id: &str,
        location: &str,
    ) -> Result<Vec<WarehouseStock>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM warehouse_stocks \
             WHERE warehouse_id = $1 AND location = $2 \
             ORDER BY product_id"
        );
        sqlx::query_as::<_, WarehouseStock>(&query)
            .bind(warehouse_id)
            .bind(location)
            .fetch_all(pool)
            .await
    }

    /// Move a set of resources to a new warehouse location.
    ///
    /// Locks every resource, applies the net stock deltas of the whole set
    /// in one upsert, repoints the resources, and writes one transport
    /// record per resource, all in one transaction. Waiting for the
    /// resource locks is bounded by `lock_timeout`. Returns the moved rows.
    pub async fn transfer(
        pool: &PgPool,
        operator: &str,
        input: &Warehousing,
        lock_timeout: Duration,
    ) -> RepoResult<Vec<MaterialResource>> {
        input.destination.validate()?;
        if input.resources.is_empty() {
            return Err(CoreError::Validation("no resources to transfer".into()).into());
        }
        for key in &input.resources {
            key.validate()?;
        }
        let keys: Vec<ResourceKey> = input
            .resources
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut tx = pool.begin().await?;
        set_lock_timeout(&mut tx, lock_timeout).await?;

        let locked = ResourceRepo::lock_many(&mut tx, &keys).await?;
        if locked.len() != keys.len() {
            let missing = keys
                .iter()
                .find(|k| !locked.iter().any(|r| &r.key() == *k))
                .map(ToString::to_string)
                .unwrap_or_default();
            return Err(CoreError::not_found("MaterialResource", missing).into());
        }

        let mut origins: Vec<(DbId, WarehouseLocation)> = Vec::with_capacity(locked.len());
        let mut items = Vec::with_capacity(locked.len());
        for resource in &locked {
            let from = resource.placement()?.ok_or_else(|| {
                CoreError::BadRequest(format!(
                    "resource {} has no warehouse placement to transfer from",
                    resource.key()
                ))
            })?;
            items.push(TransferItem {
                product_id: resource.product_id.clone(),
                quantity: resource.quantity,
                from: Some(from.clone()),
            });
            origins.push((resource.oid, from));
        }
        let deltas = transfer_deltas(&items, &input.destination)?;
        Self::apply_deltas(&mut tx, &deltas).await?;

        TransportRecordRepo::insert_many(&mut tx, operator, &origins, &input.destination).await?;
        let oids: Vec<DbId> = origins.iter().map(|(oid, _)| *oid).collect();
        let moved = ResourceRepo::set_placement_many(&mut tx, &oids, &input.destination).await?;

        tx.commit().await?;

        tracing::info!(
            resources = moved.len(),
            stock_rows = deltas.len(),
            warehouse_id = %input.destination.warehouse_id,
            location = %input.destination.location,
            operator,
            "Resources transferred",
        );
        Ok(moved)
    }
}
