//! Queue: lots consumed first-in, first-out.
//!
//! Each element mirrors a ledger resource the way a slot does, so partial
//! feeds request the same decrement from the ledger.

use serde::{Deserialize, Serialize};

use super::{draw_in_order, Lot, PartialFeed, SiteContent};
use crate::error::CoreError;
use crate::types::Quantity;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Queue {
    /// Head first.
    pub elements: Vec<Lot>,
}

impl SiteContent for Queue {
    fn feed_all(&mut self) -> Vec<Lot> {
        std::mem::take(&mut self.elements)
    }

    /// Dequeue from the head; a request larger than the head lot continues
    /// into the following elements.
    fn feed(&mut self, quantity: Quantity) -> Result<PartialFeed, CoreError> {
        if self.elements.is_empty() {
            return Err(CoreError::BadRequest("queue site is empty".into()));
        }
        let consumed = draw_in_order(&mut self.elements, quantity)?;
        Ok(PartialFeed {
            consumed,
            sync_ledger: true,
        })
    }

    /// Enqueue one element per lot at the tail.
    fn bind(&mut self, lots: Vec<Lot>) -> Result<(), CoreError> {
        self.elements.extend(lots);
        Ok(())
    }

    fn lots(&self) -> Vec<&Lot> {
        self.elements.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::site::test_support::lot;

    #[test]
    fn partial_feed_dequeues_from_head() {
        let mut queue = Queue::default();
        queue
            .bind(vec![lot("FIRST", dec!(4)), lot("SECOND", dec!(4))])
            .unwrap();

        let fed = queue.feed(dec!(3)).unwrap();
        assert!(fed.sync_ledger);
        assert_eq!(fed.consumed.len(), 1);
        assert_eq!(fed.consumed[0].resource_id, "FIRST");
        assert_eq!(queue.elements[0].quantity, dec!(1));

        let fed = queue.feed(dec!(2)).unwrap();
        assert_eq!(fed.consumed.len(), 2);
        assert_eq!(queue.elements.len(), 1);
        assert_eq!(queue.elements[0].resource_id, "SECOND");
        assert_eq!(queue.elements[0].quantity, dec!(3));
    }

    #[test]
    fn empty_queue_surfaces_failure() {
        let mut queue = Queue::default();
        assert_matches!(queue.feed(dec!(1)), Err(CoreError::BadRequest(_)));
    }

    #[test]
    fn overdraw_leaves_queue_intact() {
        let mut queue = Queue {
            elements: vec![lot("A", dec!(1)), lot("B", dec!(1))],
        };
        assert_matches!(queue.feed(dec!(3)), Err(CoreError::Validation(_)));
        assert_eq!(queue.elements.len(), 2);
    }

    #[test]
    fn bind_keeps_duplicates_as_separate_elements() {
        let mut queue = Queue::default();
        queue.bind(vec![lot("A", dec!(1))]).unwrap();
        queue.bind(vec![lot("A", dec!(2))]).unwrap();
        assert_eq!(queue.elements.len(), 2);
    }
}
