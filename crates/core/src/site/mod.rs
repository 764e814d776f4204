//! Site content model.
//!
//! Every site declares one of five content types at creation. The mutable
//! state stored at the site is a [`SiteContents`] value holding exactly the
//! variant matching that type; each variant lives in its own module and
//! implements the [`SiteContent`] consumption contract.

pub mod collection;
pub mod colqueue;
pub mod container;
pub mod queue;
pub mod slot;

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::resource::ResourceKey;
use crate::types::{Quantity, StatusId, Timestamp};

pub use collection::Collection;
pub use colqueue::Colqueue;
pub use container::Container;
pub use queue::Queue;
pub use slot::Slot;

// ---------------------------------------------------------------------------
// Site identity and type
// ---------------------------------------------------------------------------

/// Identity of a site: a named, indexed position on a station.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteKey {
    pub station: String,
    pub name: String,
    pub index: i16,
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.station, self.name, self.index)
    }
}

/// Content type declared by a site. Immutable once the site exists.
///
/// Discriminants match the `site_types` seed data.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteType {
    Slot = 1,
    Container = 2,
    Collection = 3,
    Queue = 4,
    Colqueue = 5,
}

impl SiteType {
    /// Return the database type ID.
    pub fn id(self) -> i16 {
        self as i16
    }

    /// Resolve a stored type ID. Unknown IDs are an internal error: the
    /// column is constrained by a lookup table.
    pub fn from_id(id: i16) -> Result<Self, CoreError> {
        match id {
            1 => Ok(SiteType::Slot),
            2 => Ok(SiteType::Container),
            3 => Ok(SiteType::Collection),
            4 => Ok(SiteType::Queue),
            5 => Ok(SiteType::Colqueue),
            other => Err(CoreError::Internal(format!("unsupported site type {other}"))),
        }
    }

    /// The empty contents a freshly provisioned site of this type holds.
    pub fn empty_contents(self) -> SiteContents {
        match self {
            SiteType::Slot => SiteContents::Slot(Slot::default()),
            SiteType::Container => SiteContents::Container(Container::default()),
            SiteType::Collection => SiteContents::Collection(Collection::default()),
            SiteType::Queue => SiteContents::Queue(Queue::default()),
            SiteType::Colqueue => SiteContents::Colqueue(Colqueue::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Lots
// ---------------------------------------------------------------------------

/// A lot of material held at a site.
///
/// Everything except `quantity` is a copy of the ledger row taken when the
/// lot was bound; `quantity` is what remains at the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub resource_id: String,
    pub product_type: String,
    pub product_id: String,
    pub grade: String,
    pub status: StatusId,
    pub expiry_time: Option<Timestamp>,
    pub quantity: Quantity,
}

impl Lot {
    /// Ledger key of the resource this lot was bound from.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.resource_id, &self.product_type)
    }

    /// Remove `quantity` from this lot and return it as a new lot.
    ///
    /// Callers guarantee `quantity <= self.quantity`.
    fn split_off(&mut self, quantity: Quantity) -> Lot {
        debug_assert!(quantity <= self.quantity, "lot drawn below zero");
        self.quantity -= quantity;
        Lot {
            quantity,
            ..self.clone()
        }
    }

    fn is_empty(&self) -> bool {
        self.quantity <= Decimal::ZERO
    }
}

/// Sum of the quantities of `lots`.
pub fn total_quantity<'a>(lots: impl IntoIterator<Item = &'a Lot>) -> Quantity {
    lots.into_iter().map(|lot| lot.quantity).sum()
}

/// Draw `quantity` from `lots` front to back, dropping lots that reach zero.
///
/// Fails without touching `lots` when they hold less than `quantity`.
fn draw_in_order(lots: &mut Vec<Lot>, quantity: Quantity) -> Result<Vec<Lot>, CoreError> {
    let available = total_quantity(lots.iter());
    if available < quantity {
        return Err(CoreError::Validation(format!(
            "insufficient quantity: requested {quantity}, available {available}"
        )));
    }

    let mut remaining = quantity;
    let mut drawn = Vec::new();
    for lot in lots.iter_mut() {
        if remaining <= Decimal::ZERO {
            break;
        }
        let take = remaining.min(lot.quantity);
        if take > Decimal::ZERO {
            drawn.push(lot.split_off(take));
            remaining -= take;
        }
    }
    lots.retain(|lot| !lot.is_empty());
    Ok(drawn)
}

/// Add `lot` to `lots`, merging into an existing lot of the same resource.
fn merge_lot(lots: &mut Vec<Lot>, lot: Lot) {
    match lots
        .iter_mut()
        .find(|l| l.resource_id == lot.resource_id && l.product_type == lot.product_type)
    {
        Some(existing) => existing.quantity += lot.quantity,
        None => lots.push(lot),
    }
}

// ---------------------------------------------------------------------------
// Consumption contract
// ---------------------------------------------------------------------------

/// Outcome of a partial feed.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialFeed {
    /// The consumed portions, one entry per lot drawn from.
    pub consumed: Vec<Lot>,
    /// Whether the site quantity is a cached projection of the ledger, so
    /// the same amounts must also be decremented from the ledger.
    pub sync_ledger: bool,
}

/// Consumption and loading rules of one content variant.
pub trait SiteContent {
    /// Drain the whole container and return what it held. Always legal.
    fn feed_all(&mut self) -> Vec<Lot>;

    /// Remove exactly `quantity`. Variants that cannot be partially drawn
    /// return [`CoreError::BadRequest`]; on any error the contents are
    /// unchanged.
    fn feed(&mut self, quantity: Quantity) -> Result<PartialFeed, CoreError>;

    /// Load `lots` into the site.
    fn bind(&mut self, lots: Vec<Lot>) -> Result<(), CoreError>;

    /// All lots currently held, in consumption order.
    fn lots(&self) -> Vec<&Lot>;
}

// ---------------------------------------------------------------------------
// Tagged union
// ---------------------------------------------------------------------------

/// The state stored at one site: exactly one variant, matching the site type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum SiteContents {
    Slot(Slot),
    Container(Container),
    Collection(Collection),
    Queue(Queue),
    Colqueue(Colqueue),
}

impl SiteContents {
    /// The site type this contents value belongs to.
    pub fn site_type(&self) -> SiteType {
        match self {
            SiteContents::Slot(_) => SiteType::Slot,
            SiteContents::Container(_) => SiteType::Container,
            SiteContents::Collection(_) => SiteType::Collection,
            SiteContents::Queue(_) => SiteType::Queue,
            SiteContents::Colqueue(_) => SiteType::Colqueue,
        }
    }

    fn content(&self) -> &dyn SiteContent {
        match self {
            SiteContents::Slot(c) => c,
            SiteContents::Container(c) => c,
            SiteContents::Collection(c) => c,
            SiteContents::Queue(c) => c,
            SiteContents::Colqueue(c) => c,
        }
    }

    fn content_mut(&mut self) -> &mut dyn SiteContent {
        match self {
            SiteContents::Slot(c) => c,
            SiteContents::Container(c) => c,
            SiteContents::Collection(c) => c,
            SiteContents::Queue(c) => c,
            SiteContents::Colqueue(c) => c,
        }
    }

    pub fn feed_all(&mut self) -> Vec<Lot> {
        self.content_mut().feed_all()
    }

    pub fn feed(&mut self, quantity: Quantity) -> Result<PartialFeed, CoreError> {
        self.content_mut().feed(quantity)
    }

    pub fn bind(&mut self, lots: Vec<Lot>) -> Result<(), CoreError> {
        self.content_mut().bind(lots)
    }

    /// Empty the site, discarding what it held.
    pub fn clear(&mut self) -> Vec<Lot> {
        self.feed_all()
    }

    pub fn lots(&self) -> Vec<&Lot> {
        self.content().lots()
    }

    pub fn total_quantity(&self) -> Quantity {
        total_quantity(self.lots())
    }

    pub fn is_empty(&self) -> bool {
        self.lots().is_empty()
    }
}
