//! Material resource (ledger) models and DTOs.

use mes_core::error::CoreError;
use mes_core::resource::{Inspection, ResourceKey};
use mes_core::site::Lot;
use mes_core::types::{DbId, Quantity, StatusId, Timestamp};
use mes_core::warehouse::WarehouseLocation;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `material_resources` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaterialResource {
    /// Internal identity; never reused, never changes.
    pub oid: DbId,
    pub resource_id: String,
    pub product_type: String,
    pub product_id: String,
    pub grade: String,
    pub status: StatusId,
    pub quantity: Quantity,
    pub expiry_time: Option<Timestamp>,
    pub warehouse_id: Option<String>,
    pub warehouse_location: Option<String>,
    pub inspections: Json<Vec<Inspection>>,
    pub feed_record_ids: Vec<String>,
    pub remark: String,
    pub created_by: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MaterialResource {
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.resource_id, &self.product_type)
    }

    pub fn placement(&self) -> Result<Option<WarehouseLocation>, CoreError> {
        WarehouseLocation::from_columns(
            self.warehouse_id.as_deref(),
            self.warehouse_location.as_deref(),
        )
    }

    /// A site lot carrying `quantity` of this resource.
    pub fn to_lot(&self, quantity: Quantity) -> Lot {
        Lot {
            resource_id: self.resource_id.clone(),
            product_type: self.product_type.clone(),
            product_id: self.product_id.clone(),
            grade: self.grade.clone(),
            status: self.status,
            expiry_time: self.expiry_time,
            quantity,
        }
    }
}

/// DTO for creating (or topping up) a resource.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateResource {
    #[validate(length(min = 1, max = 64))]
    pub resource_id: String,
    #[validate(length(min = 1, max = 64))]
    pub product_type: String,
    #[validate(length(min = 1, max = 64))]
    pub product_id: String,
    #[serde(default)]
    pub grade: String,
    pub status: Option<StatusId>,
    pub quantity: Quantity,
    pub expiry_time: Option<Timestamp>,
    #[serde(default)]
    pub inspections: Vec<Inspection>,
    #[serde(default)]
    pub feed_record_ids: Vec<String>,
    #[serde(default)]
    pub remark: String,
    /// Park the created quantity at this warehouse location in the same
    /// transaction.
    pub stock_in: Option<WarehouseLocation>,
}

/// DTO for splitting a resource.
#[derive(Debug, Clone, Deserialize)]
pub struct SplitResource {
    /// Quantity moved to the new resource.
    pub quantity: Quantity,
    /// Inspections moved to the new resource.
    #[serde(default)]
    pub inspection_ids: Vec<i32>,
    pub remark: Option<String>,
}

/// Both rows after a split.
#[derive(Debug, Clone, Serialize)]
pub struct SplitOutcome {
    pub source: MaterialResource,
    pub split: MaterialResource,
}

/// DTO for changing a resource's status.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateResourceStatus {
    pub status: StatusId,
}
