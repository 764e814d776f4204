//! Warehouse stock and resource transport models.

use mes_core::resource::ResourceKey;
use mes_core::types::{DbId, Quantity, Timestamp};
use mes_core::warehouse::WarehouseLocation;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `warehouse_stocks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WarehouseStock {
    pub warehouse_id: String,
    pub location: String,
    pub product_id: String,
    pub quantity: Quantity,
    pub updated_at: Timestamp,
}

/// A row from the `resource_transport_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TransportRecord {
    pub id: DbId,
    pub resource_oid: DbId,
    pub resource_id: String,
    pub product_type: String,
    pub product_id: String,
    pub quantity: Quantity,
    pub from_warehouse_id: String,
    pub from_location: String,
    pub to_warehouse_id: String,
    pub to_location: String,
    pub operator: String,
    pub created_at: Timestamp,
}

/// DTO for moving resources to a warehouse location.
#[derive(Debug, Clone, Deserialize)]
pub struct Warehousing {
    pub resources: Vec<ResourceKey>,
    pub destination: WarehouseLocation,
}
