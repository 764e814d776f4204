//! Row models and input DTOs, one module per table family.

pub mod batch;
pub mod feed_record;
pub mod resource;
pub mod site;
pub mod status;
pub mod warehouse;
