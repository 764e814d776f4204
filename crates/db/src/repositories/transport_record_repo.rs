//! Repository for the append-only `resource_transport_records` table.

use mes_core::resource::ResourceKey;
use mes_core::types::DbId;
use mes_core::warehouse::WarehouseLocation;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::warehouse::TransportRecord;

/// Column list for `resource_transport_records` queries.
const COLUMNS: &str = "\
    id, resource_oid, resource_id, product_type, product_id, quantity, \
    from_warehouse_id, from_location, to_warehouse_id, to_location, \
    operator, created_at";

pub struct TransportRecordRepo;

impl TransportRecordRepo {
    /// Write one record per `(oid, origin)` pair, moving to `destination`.
    pub async fn insert_many(
        tx: &mut Transaction<'_, Postgres>,
        operator: &str,
        origins: &[(DbId, WarehouseLocation)],
        destination: &WarehouseLocation,
    ) -> Result<u64, sqlx::Error> {
        let oids: Vec<DbId> = origins.iter().map(|(oid, _)| *oid).collect();
        let from_warehouses: Vec<&str> = origins
            .iter()
            .map(|(_, from)| from.warehouse_id.as_str())
            .collect();
        let from_locations: Vec<&str> = origins
            .iter()
            .map(|(_, from)| from.location.as_str())
            .collect();

        let result = sqlx::query(
            "INSERT INTO resource_transport_records \
                 (resource_oid, resource_id, product_type, product_id, quantity, \
                  from_warehouse_id, from_location, to_warehouse_id, to_location, operator) \
             SELECT m.oid, m.resource_id, m.product_type, m.product_id, m.quantity, \
                    f.warehouse_id, f.location, $4, $5, $6 \
             FROM UNNEST($1::bigint[], $2::text[], $3::text[]) AS f(oid, warehouse_id, location) \
             JOIN material_resources m ON m.oid = f.oid",
        )
        .bind(&oids)
        .bind(&from_warehouses)
        .bind(&from_locations)
        .bind(&destination.warehouse_id)
        .bind(&destination.location)
        .bind(operator)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Transport history of one resource, oldest first.
    pub async fn list_by_resource(
        pool: &PgPool,
        key: &ResourceKey,
    ) -> Result<Vec<TransportRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM resource_transport_records \
             WHERE resource_id = $1 AND product_type = $2 \
             ORDER BY id"
        );
        sqlx::query_as::<_, TransportRecord>(&query)
            .bind(&key.resource_id)
            .bind(&key.product_type)
            .fetch_all(pool)
            .await
    }
}
