//! Repository for the `material_resources` ledger.
//!
//! Rows are never deleted. Quantity changes only through the additive
//! upsert in [`ResourceRepo::create`] or explicit decrements (feed, split).

use mes_core::error::CoreError;
use mes_core::ids;
use mes_core::resource::{plan_split, validate_resource_status, ResourceKey};
use mes_core::types::{non_negative_quantity, DbId, Quantity, StatusId};
use mes_core::warehouse::{StockDeltas, WarehouseLocation};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::RepoResult;
use crate::models::resource::{
    CreateResource, MaterialResource, SplitOutcome, SplitResource,
};
use crate::models::status::ResourceStatus;
use crate::repositories::WarehouseStockRepo;

/// Column list for `material_resources` queries.
const COLUMNS: &str = "\
    oid, resource_id, product_type, product_id, grade, status, quantity, \
    expiry_time, warehouse_id, warehouse_location, inspections, \
    feed_record_ids, remark, created_by, created_at, updated_at";

/// Row lock taken by feed and transfer; waits up to the transaction's
/// `lock_timeout`.
const LOCK_WAIT: &str = "FOR UPDATE";

/// Row lock taken by interactive single-operator actions; fails at once
/// when the row is held.
const LOCK_NOWAIT: &str = "FOR UPDATE NOWAIT";

pub struct ResourceRepo;

impl ResourceRepo {
    /// Create a resource, or top up the existing row with the same
    /// (resource ID, product type).
    ///
    /// Topping up adds the quantity and appends the feed record IDs, provided
    /// the existing row has the same product ID; otherwise the key is taken
    /// and the call fails with [`CoreError::ResourceExisted`]. When
    /// `stock_in` is given the resource is parked there in the same
    /// transaction. Warehouse stock follows whatever placement the row ends
    /// up with.
    pub async fn create(
        pool: &PgPool,
        operator: &str,
        input: &CreateResource,
    ) -> RepoResult<MaterialResource> {
        let key = ResourceKey::new(&input.resource_id, &input.product_type);
        key.validate()?;
        let quantity = non_negative_quantity(input.quantity, "quantity")?;
        let status = input.status.unwrap_or(ResourceStatus::Available.id());
        validate_resource_status(status)?;
        if let Some(destination) = &input.stock_in {
            destination.validate()?;
        }

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO material_resources \
                 (resource_id, product_type, product_id, grade, status, quantity, \
                  expiry_time, inspections, feed_record_ids, remark, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (resource_id, product_type) DO UPDATE \
             SET quantity = material_resources.quantity + EXCLUDED.quantity, \
                 feed_record_ids = material_resources.feed_record_ids || EXCLUDED.feed_record_ids, \
                 updated_at = NOW() \
             WHERE material_resources.product_id = EXCLUDED.product_id \
             RETURNING {COLUMNS}"
        );
        let mut resource = sqlx::query_as::<_, MaterialResource>(&query)
            .bind(&input.resource_id)
            .bind(&input.product_type)
            .bind(&input.product_id)
            .bind(&input.grade)
            .bind(status)
            .bind(quantity)
            .bind(input.expiry_time)
            .bind(Json(&input.inspections))
            .bind(&input.feed_record_ids)
            .bind(&input.remark)
            .bind(operator)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                CoreError::ResourceExisted(format!(
                    "resource {key} already exists with a different product"
                ))
            })?;

        // Stock to add: the new quantity at an existing placement, or the
        // whole row when it is parked for the first time.
        let stocked = match (&input.stock_in, resource.placement()?) {
            (Some(destination), Some(current)) if *destination != current => {
                return Err(CoreError::Conflict(format!(
                    "resource {key} is already stored at {}/{}",
                    current.warehouse_id, current.location
                ))
                .into());
            }
            (Some(destination), None) => {
                resource = Self::set_placement(&mut tx, resource.oid, destination).await?;
                Some((destination.clone(), resource.quantity))
            }
            (_, Some(current)) => Some((current, quantity)),
            (None, None) => None,
        };

        if let Some((placement, delta)) = stocked {
            let mut deltas = StockDeltas::new();
            deltas.add(placement.stock_key(&resource.product_id), delta);
            WarehouseStockRepo::apply_deltas(&mut tx, &deltas.without_zeroes()).await?;
        }

        tx.commit().await?;

        tracing::info!(
            oid = resource.oid,
            resource = %key,
            quantity = %resource.quantity,
            operator,
            "Resource created or topped up",
        );
        Ok(resource)
    }

    /// Find a resource by its ledger key.
    pub async fn find(
        pool: &PgPool,
        key: &ResourceKey,
    ) -> Result<Option<MaterialResource>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM material_resources \
             WHERE resource_id = $1 AND product_type = $2"
        );
        sqlx::query_as::<_, MaterialResource>(&query)
            .bind(&key.resource_id)
            .bind(&key.product_type)
            .fetch_optional(pool)
            .await
    }

    /// Same as [`ResourceRepo::find`], inside an open transaction.
    pub async fn find_in(
        tx: &mut Transaction<'_, Postgres>,
        key: &ResourceKey,
    ) -> Result<Option<MaterialResource>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM material_resources \
             WHERE resource_id = $1 AND product_type = $2"
        );
        sqlx::query_as::<_, MaterialResource>(&query)
            .bind(&key.resource_id)
            .bind(&key.product_type)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Every row sharing a resource ID, one per product type.
    pub async fn list_by_resource_id(
        pool: &PgPool,
        resource_id: &str,
    ) -> Result<Vec<MaterialResource>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM material_resources \
             WHERE resource_id = $1 ORDER BY product_type"
        );
        sqlx::query_as::<_, MaterialResource>(&query)
            .bind(resource_id)
            .fetch_all(pool)
            .await
    }

    /// Change a resource's status. Returns `None` if the key does not exist.
    pub async fn update_status(
        pool: &PgPool,
        key: &ResourceKey,
        status: StatusId,
    ) -> RepoResult<Option<MaterialResource>> {
        validate_resource_status(status)?;
        let query = format!(
            "UPDATE material_resources SET status = $3, updated_at = NOW() \
             WHERE resource_id = $1 AND product_type = $2 \
             RETURNING {COLUMNS}"
        );
        let resource = sqlx::query_as::<_, MaterialResource>(&query)
            .bind(&key.resource_id)
            .bind(&key.product_type)
            .bind(status)
            .fetch_optional(pool)
            .await?;
        Ok(resource)
    }

    /// Lock one row, waiting up to the transaction's `lock_timeout`.
    pub async fn lock_one(
        tx: &mut Transaction<'_, Postgres>,
        key: &ResourceKey,
    ) -> Result<Option<MaterialResource>, sqlx::Error> {
        Self::lock_by_key(tx, key, LOCK_WAIT).await
    }

    /// Lock one row or fail immediately if another transaction holds it.
    pub async fn lock_one_nowait(
        tx: &mut Transaction<'_, Postgres>,
        key: &ResourceKey,
    ) -> Result<Option<MaterialResource>, sqlx::Error> {
        Self::lock_by_key(tx, key, LOCK_NOWAIT).await
    }

    async fn lock_by_key(
        tx: &mut Transaction<'_, Postgres>,
        key: &ResourceKey,
        lock: &str,
    ) -> Result<Option<MaterialResource>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM material_resources \
             WHERE resource_id = $1 AND product_type = $2 \
             {lock}"
        );
        sqlx::query_as::<_, MaterialResource>(&query)
            .bind(&key.resource_id)
            .bind(&key.product_type)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Lock every row named by `keys` in one statement.
    ///
    /// Rows are locked in key order so concurrent callers touching
    /// overlapping sets acquire them in the same sequence. Keys with no row
    /// are simply absent from the result.
    pub async fn lock_many(
        tx: &mut Transaction<'_, Postgres>,
        keys: &[ResourceKey],
    ) -> Result<Vec<MaterialResource>, sqlx::Error> {
        let resource_ids: Vec<&str> = keys.iter().map(|k| k.resource_id.as_str()).collect();
        let product_types: Vec<&str> = keys.iter().map(|k| k.product_type.as_str()).collect();
        let query = format!(
            "SELECT {COLUMNS} FROM material_resources \
             WHERE (resource_id, product_type) IN \
                 (SELECT * FROM UNNEST($1::text[], $2::text[])) \
             ORDER BY resource_id, product_type \
             {LOCK_WAIT}"
        );
        sqlx::query_as::<_, MaterialResource>(&query)
            .bind(&resource_ids)
            .bind(&product_types)
            .fetch_all(&mut **tx)
            .await
    }

    /// Decrement several rows by OID and tag them with the consuming feed
    /// record. Returns the number of rows updated.
    pub async fn decrement_many(
        tx: &mut Transaction<'_, Postgres>,
        decrements: &[(DbId, Quantity)],
        record_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let oids: Vec<DbId> = decrements.iter().map(|(oid, _)| *oid).collect();
        let quantities: Vec<Quantity> = decrements.iter().map(|(_, q)| *q).collect();
        let result = sqlx::query(
            "UPDATE material_resources AS m \
             SET quantity = m.quantity - d.quantity, \
                 feed_record_ids = CASE \
                     WHEN $3::text = ANY(m.feed_record_ids) THEN m.feed_record_ids \
                     ELSE array_append(m.feed_record_ids, $3::text) END, \
                 updated_at = NOW() \
             FROM UNNEST($1::bigint[], $2::numeric[]) AS d(oid, quantity) \
             WHERE m.oid = d.oid",
        )
        .bind(&oids)
        .bind(&quantities)
        .bind(record_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Park one resource at `destination`.
    pub async fn set_placement(
        tx: &mut Transaction<'_, Postgres>,
        oid: DbId,
        destination: &WarehouseLocation,
    ) -> Result<MaterialResource, sqlx::Error> {
        let query = format!(
            "UPDATE material_resources \
             SET warehouse_id = $2, warehouse_location = $3, updated_at = NOW() \
             WHERE oid = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaterialResource>(&query)
            .bind(oid)
            .bind(&destination.warehouse_id)
            .bind(&destination.location)
            .fetch_one(&mut **tx)
            .await
    }

    /// Park several resources at `destination`.
    pub async fn set_placement_many(
        tx: &mut Transaction<'_, Postgres>,
        oids: &[DbId],
        destination: &WarehouseLocation,
    ) -> Result<Vec<MaterialResource>, sqlx::Error> {
        let query = format!(
            "UPDATE material_resources \
             SET warehouse_id = $2, warehouse_location = $3, updated_at = NOW() \
             WHERE oid = ANY($1) \
             RETURNING {COLUMNS}"
        );
        let mut moved = sqlx::query_as::<_, MaterialResource>(&query)
            .bind(oids)
            .bind(&destination.warehouse_id)
            .bind(&destination.location)
            .fetch_all(&mut **tx)
            .await?;
        moved.sort_by(|a, b| a.key().cmp(&b.key()));
        Ok(moved)
    }

    /// Split part of a resource off into a new resource.
    ///
    /// The source is locked `NOWAIT`: a contended source fails at once with
    /// [`CoreError::LockContention`]. The new row gets a fresh resource ID
    /// and copies the product, grade, status, expiry, and placement of the
    /// source, so warehouse stock is unchanged.
    pub async fn split(
        pool: &PgPool,
        operator: &str,
        key: &ResourceKey,
        input: &SplitResource,
    ) -> RepoResult<SplitOutcome> {
        key.validate()?;
        let mut tx = pool.begin().await?;

        let source = Self::lock_one_nowait(&mut tx, key)
            .await?
            .ok_or_else(|| CoreError::not_found("MaterialResource", key))?;

        let plan = plan_split(
            source.quantity,
            input.quantity,
            &source.inspections.0,
            &input.inspection_ids,
        )?;

        let update = format!(
            "UPDATE material_resources \
             SET quantity = $2, inspections = $3, updated_at = NOW() \
             WHERE oid = $1 \
             RETURNING {COLUMNS}"
        );
        let updated_source = sqlx::query_as::<_, MaterialResource>(&update)
            .bind(source.oid)
            .bind(plan.remaining_quantity)
            .bind(Json(&plan.remaining_inspections))
            .fetch_one(&mut *tx)
            .await?;

        let insert = format!(
            "INSERT INTO material_resources \
                 (resource_id, product_type, product_id, grade, status, quantity, \
                  expiry_time, warehouse_id, warehouse_location, inspections, \
                  remark, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        let split = sqlx::query_as::<_, MaterialResource>(&insert)
            .bind(ids::new_resource_id())
            .bind(&source.product_type)
            .bind(&source.product_id)
            .bind(&source.grade)
            .bind(source.status)
            .bind(plan.split_quantity)
            .bind(source.expiry_time)
            .bind(&source.warehouse_id)
            .bind(&source.warehouse_location)
            .bind(Json(&plan.split_inspections))
            .bind(input.remark.as_deref().unwrap_or(&source.remark))
            .bind(operator)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            source = %key,
            new_resource_id = %split.resource_id,
            split_quantity = %split.quantity,
            remaining_quantity = %updated_source.quantity,
            operator,
            "Resource split",
        );
        Ok(SplitOutcome {
            source: updated_source,
            split,
        })
    }
}
