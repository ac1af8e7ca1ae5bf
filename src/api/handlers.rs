//! API Handlers
//!
//! Shared application state plus the operational endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{extract::State, Json};

use crate::api::proxy::ProxyTarget;
use crate::auth::{ClientCredentials, TokenCache};
use crate::config::Config;
use crate::content::ContentClient;
use crate::models::{HealthResponse, StatsResponse};
use crate::pricing::PricingClient;

/// Application state shared across all handlers.
///
/// The token cache is owned here and shared with the pricing client, so every
/// upstream call draws from the same bearer token.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenCache>,
    pub pricing: Arc<PricingClient>,
    pub content: ContentClient,
    pub proxy: Arc<ProxyTarget>,
    /// Outbound client reused by the proxy
    pub http: reqwest::Client,
}

impl AppState {
    /// Wires every component against one shared HTTP client.
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        let tokens = Arc::new(TokenCache::new(
            http.clone(),
            ClientCredentials::from_config(config),
            config.token_safety_margin,
        ));
        let pricing = Arc::new(PricingClient::from_config(config, http.clone(), tokens.clone()));

        Self {
            tokens,
            pricing,
            content: ContentClient::from_config(config, http.clone()),
            proxy: Arc::new(ProxyTarget::from_config(config)),
            http,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the outbound HTTP client with the configured timeout.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(config, http))
    }
}

/// Handler for GET /stats
///
/// Returns token and content cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let token_cache = state.tokens.stats().await;
    let content_cache = state.content.stats().await;

    Json(StatsResponse {
        token_cache: token_cache.into(),
        content_cache: content_cache.into(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
