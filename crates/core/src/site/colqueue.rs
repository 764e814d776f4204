//! Colqueue: a queue whose elements are collections.

use serde::{Deserialize, Serialize};

use super::{Collection, Lot, PartialFeed, SiteContent};
use crate::error::CoreError;
use crate::types::Quantity;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Colqueue {
    /// Head first.
    pub elements: Vec<Collection>,
}

impl SiteContent for Colqueue {
    fn feed_all(&mut self) -> Vec<Lot> {
        std::mem::take(&mut self.elements)
            .into_iter()
            .flat_map(|mut collection| collection.feed_all())
            .collect()
    }

    fn feed(&mut self, _quantity: Quantity) -> Result<PartialFeed, CoreError> {
        Err(CoreError::BadRequest(
            "a colqueue site can only feed all materials".into(),
        ))
    }

    /// Enqueue all bound lots as one collection at the tail.
    fn bind(&mut self, lots: Vec<Lot>) -> Result<(), CoreError> {
        if lots.is_empty() {
            return Ok(());
        }
        let mut collection = Collection::default();
        collection.bind(lots)?;
        self.elements.push(collection);
        Ok(())
    }

    fn lots(&self) -> Vec<&Lot> {
        self.elements.iter().flat_map(|c| c.lots.iter()).collect()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::site::test_support::lot;

    #[test]
    fn partial_feed_is_forbidden() {
        let mut colqueue = Colqueue::default();
        colqueue.bind(vec![lot("A", dec!(3))]).unwrap();
        assert_matches!(colqueue.feed(dec!(1)), Err(CoreError::BadRequest(_)));
        assert_eq!(colqueue.lots().len(), 1);
    }

    #[test]
    fn each_bind_adds_one_element_and_feed_all_drains_all() {
        let mut colqueue = Colqueue::default();
        colqueue
            .bind(vec![lot("A", dec!(3)), lot("B", dec!(2))])
            .unwrap();
        colqueue.bind(vec![lot("C", dec!(1))]).unwrap();
        assert_eq!(colqueue.elements.len(), 2);

        let drained = colqueue.feed_all();
        let ids: Vec<_> = drained.iter().map(|l| l.resource_id.as_str()).collect();
        assert_eq!(ids, ["A", "B", "C"]);
        assert!(colqueue.elements.is_empty());
    }
}
