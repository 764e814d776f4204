//! Feed engine.
//!
//! [`dispatcher`] resolves single feed instructions; [`feed`] runs a whole
//! request as one transaction around them.

pub mod dispatcher;
pub mod feed;

pub use feed::FeedEngine;
