//! Feed instructions, consumption records, and the ledger-decrement
//! accumulator.
//!
//! A feed request names an optional batch and a list of per-site
//! instructions. Each instruction resolves to one [`FeedDetail`] and,
//! for cached-quantity sites and direct resource feeds, to ledger
//! decrements that the engine applies under one aggregated lock.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::batch::BatchKey;
use crate::error::CoreError;
use crate::resource::ResourceKey;
use crate::site::{Lot, SiteKey};
use crate::types::{positive_quantity, Quantity, StatusId, Timestamp};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Direct consumption from one ledger resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceFeed {
    pub resource_id: String,
    pub product_type: String,
    pub quantity: Quantity,
}

impl ResourceFeed {
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.resource_id, &self.product_type)
    }
}

/// One feed instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedPerSite {
    /// Consume from a site's contents.
    BySite {
        site: SiteKey,
        #[serde(default)]
        feed_all: bool,
        #[serde(default)]
        quantity: Option<Quantity>,
    },
    /// Consume from a ledger resource directly, recording the site it was fed at.
    ByResource { site: SiteKey, resource: ResourceFeed },
    /// Consume from a ledger resource directly, with no site.
    ResourceOnly { resource: ResourceFeed },
}

impl FeedPerSite {
    /// Check the instruction's own shape; legality against the site type is
    /// decided when it is dispatched.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            FeedPerSite::BySite {
                feed_all, quantity, ..
            } => {
                if !feed_all {
                    let quantity = quantity.ok_or_else(|| {
                        CoreError::Validation(
                            "quantity is required unless feed_all is set".into(),
                        )
                    })?;
                    positive_quantity(quantity, "quantity")?;
                }
                Ok(())
            }
            FeedPerSite::ByResource { resource, .. } | FeedPerSite::ResourceOnly { resource } => {
                resource.key().validate()?;
                positive_quantity(resource.quantity, "quantity")?;
                Ok(())
            }
        }
    }
}

/// A whole feed request, executed atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedRequest {
    /// Batch the resulting record is appended to. Direct resource feeds may
    /// be batch-less.
    #[serde(default)]
    pub batch: Option<BatchKey>,
    pub feeds: Vec<FeedPerSite>,
}

impl FeedRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.feeds.is_empty() {
            return Err(CoreError::Validation(
                "a feed request needs at least one instruction".into(),
            ));
        }
        if let Some(batch) = &self.batch {
            batch.validate()?;
        } else if self
            .feeds
            .iter()
            .any(|f| matches!(f, FeedPerSite::BySite { .. }))
        {
            return Err(CoreError::Validation(
                "feeding from a site requires a batch".into(),
            ));
        }
        self.feeds.iter().try_for_each(FeedPerSite::validate)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One consumption line of a feed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedResource {
    pub resource_id: String,
    pub product_id: String,
    pub product_type: String,
    pub grade: String,
    pub status: StatusId,
    pub expiry_time: Option<Timestamp>,
    pub quantity: Quantity,
    /// Set when a direct resource feed named a resource the ledger does not
    /// hold; the descriptive fields are then blank.
    #[serde(default)]
    pub unresolved: bool,
}

impl FeedResource {
    /// Line for a resource that could not be found in the ledger.
    pub fn unresolved(key: &ResourceKey, quantity: Quantity) -> Self {
        Self {
            resource_id: key.resource_id.clone(),
            product_id: String::new(),
            product_type: key.product_type.clone(),
            grade: String::new(),
            status: 0,
            expiry_time: None,
            quantity,
            unresolved: true,
        }
    }
}

impl From<Lot> for FeedResource {
    fn from(lot: Lot) -> Self {
        Self {
            resource_id: lot.resource_id,
            product_id: lot.product_id,
            product_type: lot.product_type,
            grade: lot.grade,
            status: lot.status,
            expiry_time: lot.expiry_time,
            quantity: lot.quantity,
            unresolved: false,
        }
    }
}

/// Consumption at one site (or at no site, for resource-only feeds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedDetail {
    pub site: Option<SiteKey>,
    pub resources: Vec<FeedResource>,
}

// ---------------------------------------------------------------------------
// Ledger decrements
// ---------------------------------------------------------------------------

/// An instruction to decrement a ledger resource (and its warehouse stock).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerDecrement {
    pub key: ResourceKey,
    pub quantity: Quantity,
}

/// Collects decrements per resource key, summing repeats.
///
/// Iteration is in key order, which is also the order rows are locked in.
#[derive(Debug, Clone, Default)]
pub struct DecrementAccumulator {
    totals: BTreeMap<ResourceKey, Quantity>,
}

impl DecrementAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, decrement: LedgerDecrement) {
        *self.totals.entry(decrement.key).or_insert(Decimal::ZERO) += decrement.quantity;
    }

    pub fn extend(&mut self, decrements: impl IntoIterator<Item = LedgerDecrement>) {
        for decrement in decrements {
            self.add(decrement);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Number of distinct resource keys.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn get(&self, key: &ResourceKey) -> Option<Quantity> {
        self.totals.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ResourceKey> {
        self.totals.keys()
    }
}
