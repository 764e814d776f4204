//! Generation of externally visible identifiers.
//!
//! Feed records and split-off resources receive globally unique,
//! upper-case identifiers derived from random UUIDs.

use uuid::Uuid;

/// A new feed-record ID: 32 upper-case hex characters.
pub fn new_record_id() -> String {
    Uuid::new_v4().simple().to_string().to_uppercase()
}

/// A new resource ID for the row created by a split.
pub fn new_resource_id() -> String {
    Uuid::new_v4().simple().to_string().to_uppercase()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn record_ids_are_uppercase_hex() {
        let id = new_record_id();
        assert_eq!(id.len(), 32);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn ids_do_not_repeat() {
        let ids: HashSet<String> = (0..1000).map(|_| new_record_id()).collect();
        assert_eq!(ids.len(), 1000);
        assert_ne!(new_resource_id(), new_resource_id());
    }
}
