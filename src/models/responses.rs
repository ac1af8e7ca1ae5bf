//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::content::{Discount, Post};
use crate::models::Medication;

/// Response body for `GET /api/medications/search`
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub results: Vec<Medication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchResponse {
    pub fn new(results: Vec<Medication>) -> Self {
        let message = results
            .is_empty()
            .then(|| "No medications found matching your search".to_string());
        Self { results, message }
    }
}

/// Response body for `GET /api/medications/names`
#[derive(Debug, Clone, Serialize)]
pub struct RawResultsResponse {
    pub results: Value,
}

/// Response body for `GET /api/pharmacies`
#[derive(Debug, Clone, Serialize)]
pub struct PharmaciesResponse {
    pub pharmacies: Vec<Value>,
}

/// Response body for `GET /api/content/posts`
#[derive(Debug, Clone, Serialize)]
pub struct PostsResponse {
    pub posts: Vec<Post>,
}

/// Response body for `GET /api/content/discounts`
#[derive(Debug, Clone, Serialize)]
pub struct DiscountsResponse {
    pub discounts: Vec<Discount>,
}

/// Cache counters with the derived hit rate.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsView {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub total_entries: usize,
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheStatsView {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub token_cache: CacheStatsView,
    pub content_cache: CacheStatsView,
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
