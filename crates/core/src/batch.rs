//! Production batch identity and status constants.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Batch status (maps to `batch_statuses` seed data)
// ---------------------------------------------------------------------------

/// Created, nothing fed yet. The default for new batches.
pub const BATCH_STATUS_PREPARING: i16 = 1;
pub const BATCH_STATUS_PRODUCING: i16 = 2;
pub const BATCH_STATUS_ON_HOLD: i16 = 3;
pub const BATCH_STATUS_CANCELED: i16 = 4;
pub const BATCH_STATUS_CLOSING: i16 = 5;
pub const BATCH_STATUS_CLOSED: i16 = 6;

const ALL_BATCH_STATUSES: &[i16] = &[
    BATCH_STATUS_PREPARING,
    BATCH_STATUS_PRODUCING,
    BATCH_STATUS_ON_HOLD,
    BATCH_STATUS_CANCELED,
    BATCH_STATUS_CLOSING,
    BATCH_STATUS_CLOSED,
];

pub fn validate_batch_status(status: i16) -> Result<(), CoreError> {
    if ALL_BATCH_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("unknown batch status {status}")))
    }
}

/// Identity of a batch: a numbered run within a work order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchKey {
    pub work_order: String,
    pub number: i16,
}

impl BatchKey {
    pub fn new(work_order: impl Into<String>, number: i16) -> Self {
        Self {
            work_order: work_order.into(),
            number,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.work_order.trim().is_empty() {
            return Err(CoreError::Validation("work_order must not be empty".into()));
        }
        if self.number <= 0 {
            return Err(CoreError::Validation(format!(
                "batch number must be positive, got {}",
                self.number
            )));
        }
        Ok(())
    }
}

impl fmt::Display for BatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.work_order, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_key_requires_work_order_and_positive_number() {
        assert!(BatchKey::new("WO1", 1).validate().is_ok());
        assert!(BatchKey::new("", 1).validate().is_err());
        assert!(BatchKey::new("WO1", 0).validate().is_err());
    }

    #[test]
    fn batch_key_display() {
        assert_eq!(BatchKey::new("WO1", 3).to_string(), "WO1#3");
    }

    #[test]
    fn status_range_is_enforced() {
        assert!(validate_batch_status(BATCH_STATUS_CLOSED).is_ok());
        assert!(validate_batch_status(7).is_err());
    }
}
