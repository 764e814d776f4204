//! Collection: an undivided lot set that is only ever consumed whole.

use serde::{Deserialize, Serialize};

use super::{merge_lot, Lot, PartialFeed, SiteContent};
use crate::error::CoreError;
use crate::types::Quantity;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub lots: Vec<Lot>,
}

impl SiteContent for Collection {
    fn feed_all(&mut self) -> Vec<Lot> {
        std::mem::take(&mut self.lots)
    }

    fn feed(&mut self, _quantity: Quantity) -> Result<PartialFeed, CoreError> {
        Err(CoreError::BadRequest(
            "a collection site can only feed all materials".into(),
        ))
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

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::site::test_support::lot;

    #[test]
    fn partial_feed_is_rejected_without_change() {
        let mut collection = Collection {
            lots: vec![lot("A", dec!(20))],
        };
        let err = collection.feed(dec!(15)).unwrap_err();
        assert_matches!(&err, CoreError::BadRequest(msg) if msg == "a collection site can only feed all materials");
        assert_eq!(collection.lots[0].quantity, dec!(20));
    }

    #[test]
    fn feed_all_returns_every_lot() {
        let mut collection = Collection {
            lots: vec![lot("A", dec!(20)), lot("B", dec!(1))],
        };
        let drained = collection.feed_all();
        assert_eq!(drained.len(), 2);
        assert!(collection.lots.is_empty());
    }
}
