//! Warehouse placement and stock-delta arithmetic.
//!
//! Warehouse stock is a derived aggregate per (warehouse, location, product).
//! Every movement is expressed as a set of signed deltas applied additively.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Quantity;

/// Where a resource is parked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WarehouseLocation {
    pub warehouse_id: String,
    pub location: String,
}

impl WarehouseLocation {
    pub fn new(warehouse_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            warehouse_id: warehouse_id.into(),
            location: location.into(),
        }
    }

    /// Build a placement from the two nullable ledger columns. Both must be
    /// set or both null.
    pub fn from_columns(
        warehouse_id: Option<&str>,
        location: Option<&str>,
    ) -> Result<Option<Self>, CoreError> {
        match (warehouse_id, location) {
            (Some(w), Some(l)) => Ok(Some(Self::new(w, l))),
            (None, None) => Ok(None),
            _ => Err(CoreError::Internal(
                "warehouse placement is half set".into(),
            )),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.warehouse_id.trim().is_empty() || self.location.trim().is_empty() {
            return Err(CoreError::Validation(
                "warehouse_id and location must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Stock key for `product_id` at this placement.
    pub fn stock_key(&self, product_id: &str) -> StockKey {
        StockKey {
            warehouse_id: self.warehouse_id.clone(),
            location: self.location.clone(),
            product_id: product_id.to_string(),
        }
    }
}

/// Key of one warehouse stock row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StockKey {
    pub warehouse_id: String,
    pub location: String,
    pub product_id: String,
}

/// Accumulated signed stock changes, keyed and ordered by [`StockKey`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockDeltas {
    deltas: BTreeMap<StockKey, Quantity>,
}

impl StockDeltas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` (positive or negative) to `key`.
    pub fn add(&mut self, key: StockKey, delta: Quantity) {
        *self.deltas.entry(key).or_insert(Decimal::ZERO) += delta;
    }

    /// Drop keys whose deltas cancelled out.
    pub fn without_zeroes(mut self) -> Self {
        self.deltas.retain(|_, d| !d.is_zero());
        self
    }

    /// Sum of every delta.
    pub fn net(&self) -> Quantity {
        self.deltas.values().copied().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn get(&self, key: &StockKey) -> Option<Quantity> {
        self.deltas.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StockKey, &Quantity)> {
        self.deltas.iter()
    }
}

/// One resource taking part in a transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferItem {
    pub product_id: String,
    pub quantity: Quantity,
    pub from: Option<WarehouseLocation>,
}

/// Net stock deltas for moving every item to `destination`.
///
/// Each item must already be placed; the stock leaving its old location is
/// exactly the stock arriving at the destination, so the deltas sum to zero.
pub fn transfer_deltas(
    items: &[TransferItem],
    destination: &WarehouseLocation,
) -> Result<StockDeltas, CoreError> {
    let mut deltas = StockDeltas::new();
    for item in items {
        let from = item.from.as_ref().ok_or_else(|| {
            CoreError::BadRequest(format!(
                "resource of product {} has no warehouse placement to transfer from",
                item.product_id
            ))
        })?;
        deltas.add(from.stock_key(&item.product_id), -item.quantity);
        deltas.add(destination.stock_key(&item.product_id), item.quantity);
    }
    Ok(deltas.without_zeroes())
}
