//! Domain logic for the material feed engine: quantities, site content
//! variants, feed instructions, and ledger arithmetic. No I/O.

pub mod batch;
pub mod error;
pub mod feed;
pub mod ids;
pub mod resource;
pub mod site;
pub mod types;
pub mod warehouse;
