//! Cache Module
//!
//! Expiring values, a TTL-bounded keyed store and hit/miss statistics shared by
//! the token slot and the content feed.

mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

pub use entry::{current_timestamp_ms, Expiring};
pub use stats::CacheStats;
pub use store::TtlStore;
