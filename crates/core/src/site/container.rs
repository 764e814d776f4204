//! Container: independent lots stacked in one site.
//!
//! The container is the full representation of what was bound to it, so
//! partial feeds never propagate back to the ledger.

use serde::{Deserialize, Serialize};

use super::{draw_in_order, merge_lot, Lot, PartialFeed, SiteContent};
use crate::error::CoreError;
use crate::types::Quantity;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub lots: Vec<Lot>,
}

impl SiteContent for Container {
    fn feed_all(&mut self) -> Vec<Lot> {
        std::mem::take(&mut self.lots)
    }

    fn feed(&mut self, quantity: Quantity) -> Result<PartialFeed, CoreError> {
        if self.lots.is_empty() {
            return Err(CoreError::BadRequest("container site is empty".into()));
        }
        let consumed = draw_in_order(&mut self.lots, quantity)?;
        Ok(PartialFeed {
            consumed,
            sync_ledger: false,
        })
    }

    fn bind(&mut self, lots: Vec<Lot>) -> Result<(), CoreError> {
        for lot in lots {
            merge_lot(&mut self.lots, lot);
        }
        Ok(())
    }

    fn lots(&self) -> Vec<&Lot> {
        self.lots.iter().collect()
    }
}
