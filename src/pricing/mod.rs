//! Pricing Module
//!
//! Upstream request layer for the drug-pricing API: search, single and
//! multi-drug pricing, and nearby pharmacies.

mod client;
mod payloads;

pub use client::PricingClient;
pub use payloads::{Coordinates, MultiDrugItem, QuantityOverride};
