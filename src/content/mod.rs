//! Content Module
//!
//! Posts and discount offers from the companion wellness site.

mod client;
mod types;

pub use client::ContentClient;
pub use types::{Discount, DiscountMeta, FeaturedImage, MediaItem, Post};
