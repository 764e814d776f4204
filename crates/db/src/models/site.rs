//! Site and site-contents models.

use mes_core::error::CoreError;
use mes_core::site::{SiteContents, SiteKey, SiteType};
use mes_core::types::{DbId, Quantity, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A row from `sites` joined with its `site_contents` row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Site {
    pub id: DbId,
    pub station: String,
    pub name: String,
    pub site_index: i16,
    pub site_type: i16,
    pub contents: Json<SiteContents>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Site {
    pub fn key(&self) -> SiteKey {
        SiteKey {
            station: self.station.clone(),
            name: self.name.clone(),
            index: self.site_index,
        }
    }

    /// Declared type, checked against the stored contents variant.
    pub fn checked_type(&self) -> Result<SiteType, CoreError> {
        let declared = SiteType::from_id(self.site_type)?;
        if self.contents.0.site_type() != declared {
            return Err(CoreError::Internal(format!(
                "site {} declares {declared:?} but holds {:?} contents",
                self.key(),
                self.contents.0.site_type()
            )));
        }
        Ok(declared)
    }
}

/// DTO for provisioning a site.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSite {
    #[validate(length(min = 1, max = 64))]
    pub station: String,
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(range(min = 0))]
    pub index: i16,
    pub site_type: SiteType,
}

/// One ledger resource to load into a site.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BindResource {
    #[validate(length(min = 1, max = 64))]
    pub resource_id: String,
    #[validate(length(min = 1, max = 64))]
    pub product_type: String,
    /// Quantity to place at the site; defaults to the full ledger quantity.
    pub quantity: Option<Quantity>,
}

/// DTO for binding resources to a site.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BindSite {
    #[validate(length(min = 1))]
    #[validate(nested)]
    pub resources: Vec<BindResource>,
}
