//! Slot: a single lot whose quantity mirrors the ledger.

use serde::{Deserialize, Serialize};

use super::{Lot, PartialFeed, SiteContent};
use crate::error::CoreError;
use crate::types::Quantity;

/// Holds at most one lot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub material: Option<Lot>,
}

impl SiteContent for Slot {
    fn feed_all(&mut self) -> Vec<Lot> {
        self.material.take().into_iter().collect()
    }

    fn feed(&mut self, quantity: Quantity) -> Result<PartialFeed, CoreError> {
        let lot = self
            .material
            .as_mut()
            .ok_or_else(|| CoreError::BadRequest("slot site is empty".into()))?;

        if quantity > lot.quantity {
            return Err(CoreError::Validation(format!(
                "insufficient quantity: requested {quantity}, available {}",
                lot.quantity
            )));
        }

        let consumed = lot.split_off(quantity);
        if lot.is_empty() {
            self.material = None;
        }

        Ok(PartialFeed {
            consumed: vec![consumed],
            sync_ledger: true,
        })
    }

    /// Replace the held lot. A slot takes exactly one resource.
    fn bind(&mut self, lots: Vec<Lot>) -> Result<(), CoreError> {
        let mut lots = lots.into_iter();
        match (lots.next(), lots.next()) {
            (Some(lot), None) => {
                self.material = Some(lot);
                Ok(())
            }
            _ => Err(CoreError::Validation(
                "a slot site must be bound with exactly one resource".into(),
            )),
        }
    }

    fn lots(&self) -> Vec<&Lot> {
        self.material.iter().collect()
    }
}
