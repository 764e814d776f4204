//! Ledger keys, inspection remarks, and split planning for material resources.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{round_quantity, Quantity};

// ---------------------------------------------------------------------------
// Resource status (maps to `resource_statuses` seed data)
// ---------------------------------------------------------------------------

pub const RESOURCE_STATUS_AVAILABLE: i16 = 1;
pub const RESOURCE_STATUS_HOLD: i16 = 2;
pub const RESOURCE_STATUS_INSPECTION: i16 = 3;
pub const RESOURCE_STATUS_MONITOR: i16 = 4;
pub const RESOURCE_STATUS_UNAVAILABLE: i16 = 5;

const ALL_RESOURCE_STATUSES: &[i16] = &[
    RESOURCE_STATUS_AVAILABLE,
    RESOURCE_STATUS_HOLD,
    RESOURCE_STATUS_INSPECTION,
    RESOURCE_STATUS_MONITOR,
    RESOURCE_STATUS_UNAVAILABLE,
];

/// Reject status IDs outside the seeded range.
pub fn validate_resource_status(status: i16) -> Result<(), CoreError> {
    if ALL_RESOURCE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "unknown resource status {status}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Unique ledger key. A resource ID alone is not unique: the same barcode
/// may exist under several product types as distinct rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKey {
    pub resource_id: String,
    pub product_type: String,
}

impl ResourceKey {
    pub fn new(resource_id: impl Into<String>, product_type: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            product_type: product_type.into(),
        }
    }

    /// Reject blank key components.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.resource_id.trim().is_empty() {
            return Err(CoreError::Validation("resource_id must not be empty".into()));
        }
        if self.product_type.trim().is_empty() {
            return Err(CoreError::Validation("product_type must not be empty".into()));
        }
        Ok(())
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.resource_id, self.product_type)
    }
}

// ---------------------------------------------------------------------------
// Inspections
// ---------------------------------------------------------------------------

/// An inspection remark attached to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    pub id: i32,
    pub remark: String,
}

// ---------------------------------------------------------------------------
// Split
// ---------------------------------------------------------------------------

/// How a split partitions a source resource.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPlan {
    /// Quantity left on the source row.
    pub remaining_quantity: Quantity,
    /// Quantity carried by the new row.
    pub split_quantity: Quantity,
    /// Inspections staying on the source row.
    pub remaining_inspections: Vec<Inspection>,
    /// Inspections moving to the new row.
    pub split_inspections: Vec<Inspection>,
}

/// Plan a split of `split_quantity` off a source holding `source_quantity`.
///
/// The split quantity must be strictly positive and strictly less than the
/// source quantity. Inspections whose IDs appear in `moved_inspection_ids`
/// go to the new row; every listed ID must exist on the source.
pub fn plan_split(
    source_quantity: Quantity,
    split_quantity: Quantity,
    inspections: &[Inspection],
    moved_inspection_ids: &[i32],
) -> Result<SplitPlan, CoreError> {
    let split_quantity = round_quantity(split_quantity);
    if split_quantity <= Decimal::ZERO || split_quantity >= source_quantity {
        return Err(CoreError::InvalidNumber(format!(
            "split quantity must be greater than 0 and less than {source_quantity}, got {split_quantity}"
        )));
    }

    if let Some(missing) = moved_inspection_ids
        .iter()
        .find(|id| !inspections.iter().any(|i| i.id == **id))
    {
        return Err(CoreError::Validation(format!(
            "inspection {missing} does not exist on the source resource"
        )));
    }

    let (split_inspections, remaining_inspections) = inspections
        .iter()
        .cloned()
        .partition(|i| moved_inspection_ids.contains(&i.id));

    Ok(SplitPlan {
        remaining_quantity: source_quantity - split_quantity,
        split_quantity,
        remaining_inspections,
        split_inspections,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    use super::*;

    fn inspections() -> Vec<Inspection> {
        vec![
            Inspection {
                id: 1,
                remark: "bubbles".into(),
            },
            Inspection {
                id: 2,
                remark: "scratch".into(),
            },
        ]
    }

    #[test]
    fn split_partitions_quantity_exactly() {
        let plan = plan_split(dec!(100), dec!(30), &[], &[]).unwrap();
        assert_eq!(plan.remaining_quantity, dec!(70));
        assert_eq!(plan.split_quantity, dec!(30));
        assert_eq!(plan.remaining_quantity + plan.split_quantity, dec!(100));
    }

    #[test]
    fn split_quantity_bounds_are_exclusive() {
        for bad in [dec!(0), dec!(-1), dec!(100), dec!(101)] {
            assert_matches!(
                plan_split(dec!(100), bad, &[], &[]),
                Err(CoreError::InvalidNumber(_))
            );
        }
        assert!(plan_split(dec!(100), dec!(99.999999), &[], &[]).is_ok());
    }

    #[test]
    fn split_moves_selected_inspections() {
        let plan = plan_split(dec!(10), dec!(4), &inspections(), &[2]).unwrap();
        assert_eq!(plan.remaining_inspections.len(), 1);
        assert_eq!(plan.remaining_inspections[0].id, 1);
        assert_eq!(plan.split_inspections.len(), 1);
        assert_eq!(plan.split_inspections[0].remark, "scratch");
    }

    #[test]
    fn split_rejects_unknown_inspection() {
        assert_matches!(
            plan_split(dec!(10), dec!(4), &inspections(), &[7]),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn blank_key_is_invalid() {
        assert!(ResourceKey::new("", "RUBBER").validate().is_err());
        assert!(ResourceKey::new("A", " ").validate().is_err());
        assert!(ResourceKey::new("A", "RUBBER").validate().is_ok());
    }

    #[test]
    fn status_range_is_enforced() {
        assert!(validate_resource_status(RESOURCE_STATUS_HOLD).is_ok());
        assert!(validate_resource_status(0).is_err());
        assert!(validate_resource_status(6).is_err());
    }
}
