//! Request, response and domain models for the gateway API
//!
//! This module defines the DTOs used for serializing/deserializing HTTP
//! bodies and the typed slices of upstream payloads the gateway inspects.

pub mod drug_sheet;
pub mod medication;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use drug_sheet::{
    AlternateDrug, DrugPriceSheet, DrugSummary, FormOption, QuantityOption, StrengthOption,
};
pub use medication::{normalize_search_payload, Medication};
pub use requests::{
    CodeLookup, DrugNameParams, GsnParams, GsnPricingParams, MultiPricingByGsnRequest,
    MultiPricingByNameRequest, NdcPricingParams, OptionsParams, PharmacyParams, PricingParams,
    SearchParams,
};
pub use responses::{
    CacheStatsView, DiscountsResponse, HealthResponse, PharmaciesResponse, PostsResponse,
    RawResultsResponse, SearchResponse, StatsResponse,
};
