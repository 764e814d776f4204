//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or an open transaction) as the first argument.

pub mod batch_repo;
pub mod feed_record_repo;
pub mod resource_repo;
pub mod site_repo;
pub mod transport_record_repo;
pub mod warehouse_stock_repo;

pub use batch_repo::BatchRepo;
pub use feed_record_repo::FeedRecordRepo;
pub use resource_repo::ResourceRepo;
pub use site_repo::SiteRepo;
pub use transport_record_repo::TransportRecordRepo;
pub use warehouse_stock_repo::WarehouseStockRepo;
