//! Bearer Token Cache
//!
//! Holds one client-credentials token and refreshes it when it goes stale.

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::cache::{current_timestamp_ms, CacheStats, Expiring};
use crate::config::Config;
use crate::error::{GatewayError, Result};

/// Client-credentials grant parameters.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub auth_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
}

impl ClientCredentials {
    pub fn from_config(config: &Config) -> Self {
        Self {
            auth_url: config.auth_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.auth_scope.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    expires_in: u64,
}

#[derive(Debug, Default)]
struct TokenSlot {
    token: Option<Expiring<String>>,
    stats: CacheStats,
}

// == Token Cache ==
/// Single-value bearer token cache.
///
/// The slot lock is held across a refresh, so callers racing on an expired
/// token wait for one credential exchange instead of issuing their own.
#[derive(Debug)]
pub struct TokenCache {
    http: reqwest::Client,
    credentials: ClientCredentials,
    /// Seconds subtracted from `expires_in`
    safety_margin: u64,
    slot: Mutex<TokenSlot>,
}

impl TokenCache {
    pub fn new(http: reqwest::Client, credentials: ClientCredentials, safety_margin: u64) -> Self {
        Self {
            http,
            credentials,
            safety_margin,
            slot: Mutex::new(TokenSlot::default()),
        }
    }

    // == Get ==
    /// Returns the cached token, exchanging credentials first if it is absent or stale.
    pub async fn get(&self) -> Result<String> {
        let mut slot = self.slot.lock().await;

        if let Some(token) = slot.token.as_ref().filter(|t| !t.is_expired()) {
            let value = token.value.clone();
            slot.stats.record_hit();
            debug!("Using cached auth token");
            return Ok(value);
        }

        slot.stats.record_miss();
        self.refresh_locked(&mut slot).await
    }

    // == Refresh ==
    /// Forces a credential exchange regardless of the cached token's age.
    pub async fn refresh(&self) -> Result<String> {
        let mut slot = self.slot.lock().await;
        slot.stats.record_miss();
        self.refresh_locked(&mut slot).await
    }

    /// Drops the cached token so the next `get` refreshes.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        slot.token = None;
        slot.stats.set_total_entries(0);
    }

    pub async fn stats(&self) -> CacheStats {
        self.slot.lock().await.stats.clone()
    }

    async fn refresh_locked(&self, slot: &mut TokenSlot) -> Result<String> {
        match self.exchange().await {
            Ok(token) => {
                let value = token.value.clone();
                slot.token = Some(token);
                slot.stats.set_total_entries(1);
                Ok(value)
            }
            Err(err) => {
                slot.token = None;
                slot.stats.set_total_entries(0);
                Err(err)
            }
        }
    }

    async fn exchange(&self) -> Result<Expiring<String>> {
        let creds = &self.credentials;
        info!(
            auth_url = %creds.auth_url,
            client_id = %truncate(&creds.client_id, 5),
            "Requesting new auth token"
        );

        let response = self
            .http
            .post(&creds.auth_url)
            .basic_auth(&creds.client_id, Some(&creds.client_secret))
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", creds.scope.as_str()),
            ])
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                context: "Failed to reach authentication service",
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "Auth token request rejected");
            return Err(GatewayError::Auth { status, body });
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            GatewayError::InvalidResponse(format!("Invalid token response: {}", e))
        })?;

        let lifetime_ms = token.expires_in.saturating_sub(self.safety_margin) as i64 * 1000;
        info!(
            token_type = token.token_type.as_deref().unwrap_or("bearer"),
            expires_in = token.expires_in,
            "Auth token received"
        );

        Ok(Expiring::until(
            token.access_token,
            current_timestamp_ms() + lifetime_ms,
        ))
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    let head: String = value.chars().take(max_chars).collect();
    format!("{}...", head)
}
