pub mod batches;
pub mod feeds;
pub mod resources;
pub mod sites;
pub mod warehousing;
