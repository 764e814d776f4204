//! Production batch models and DTOs.

use mes_core::batch::BatchKey;
use mes_core::types::{DbId, StatusId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `batches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Batch {
    pub id: DbId,
    pub work_order: String,
    pub number: i16,
    pub status: StatusId,
    pub note: String,
    /// Feed record IDs in the order they were appended.
    pub records_id: Vec<String>,
    pub updated_by: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Batch {
    pub fn key(&self) -> BatchKey {
        BatchKey::new(&self.work_order, self.number)
    }
}

/// DTO for creating a batch.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBatch {
    #[validate(length(min = 1, max = 64))]
    pub work_order: String,
    #[validate(range(min = 1))]
    pub number: i16,
    /// Defaults to preparing.
    pub status: Option<StatusId>,
    pub note: Option<String>,
}

/// DTO for updating a batch. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBatch {
    pub status: Option<StatusId>,
    pub note: Option<String>,
}
