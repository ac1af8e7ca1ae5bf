//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::pricing::Coordinates;

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the drug-pricing API
    pub pricing_api_url: String,
    /// OAuth2 token endpoint for the client-credentials grant
    pub auth_url: String,
    /// OAuth2 client ID
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// Scope requested with the token
    pub auth_scope: String,
    /// Tenant mapping name sent with every pricing request
    pub tenant_mapping: String,
    /// Seconds shaved off a token's lifetime before it is considered stale
    pub token_safety_margin: u64,
    /// Origin used for every ZIP code until real geocoding exists
    pub default_origin: Coordinates,
    /// Upstream request timeout in seconds
    pub upstream_timeout: u64,
    /// Single host the generic proxy may reach; proxy is disabled when unset
    pub proxy_target_url: Option<String>,
    /// Path prefixes the proxy may forward to; empty allows any path on the target
    pub proxy_allowed_paths: Vec<String>,
    /// WordPress GraphQL endpoint for the content feed
    pub wordpress_api_url: Option<String>,
    /// Value of the `authorization` header sent to WordPress
    pub wordpress_auth_token: Option<String>,
    /// Content cache TTL in seconds
    pub content_cache_ttl: u64,
    /// Maximum number of cached content responses
    pub content_cache_max_entries: usize,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PRICING_API_URL` - Pricing API base URL
    /// - `PRICING_AUTH_URL` - OAuth2 token endpoint
    /// - `PRICING_CLIENT_ID` / `PRICING_CLIENT_SECRET` - client credentials
    /// - `PRICING_AUTH_SCOPE` - requested scope (default: ccds.read)
    /// - `PRICING_TENANT` - tenant mapping name (default: walkerrx)
    /// - `TOKEN_SAFETY_MARGIN` - seconds before expiry to refresh (default: 60)
    /// - `DEFAULT_LATITUDE` / `DEFAULT_LONGITUDE` - placeholder origin
    /// - `UPSTREAM_TIMEOUT` - outbound request timeout in seconds (default: 30)
    /// - `PROXY_TARGET_URL` - proxy target, unset disables the proxy
    /// - `PROXY_ALLOWED_PATHS` - comma separated path prefixes
    /// - `WORDPRESS_API_URL` / `WORDPRESS_AUTH_TOKEN` - content feed
    /// - `CONTENT_CACHE_TTL` - seconds (default: 3600)
    /// - `CONTENT_CACHE_MAX_ENTRIES` - entries (default: 256)
    /// - `CLEANUP_INTERVAL` - cleanup frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT", defaults.server_port),
            pricing_api_url: string_var("PRICING_API_URL").unwrap_or(defaults.pricing_api_url),
            auth_url: string_var("PRICING_AUTH_URL").unwrap_or(defaults.auth_url),
            client_id: string_var("PRICING_CLIENT_ID").unwrap_or(defaults.client_id),
            client_secret: string_var("PRICING_CLIENT_SECRET").unwrap_or(defaults.client_secret),
            auth_scope: string_var("PRICING_AUTH_SCOPE").unwrap_or(defaults.auth_scope),
            tenant_mapping: string_var("PRICING_TENANT").unwrap_or(defaults.tenant_mapping),
            token_safety_margin: parse_var("TOKEN_SAFETY_MARGIN", defaults.token_safety_margin),
            default_origin: Coordinates {
                latitude: parse_var("DEFAULT_LATITUDE", defaults.default_origin.latitude),
                longitude: parse_var("DEFAULT_LONGITUDE", defaults.default_origin.longitude),
            },
            upstream_timeout: parse_var("UPSTREAM_TIMEOUT", defaults.upstream_timeout),
            proxy_target_url: string_var("PROXY_TARGET_URL"),
            proxy_allowed_paths: string_var("PROXY_ALLOWED_PATHS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            wordpress_api_url: string_var("WORDPRESS_API_URL"),
            wordpress_auth_token: string_var("WORDPRESS_AUTH_TOKEN"),
            content_cache_ttl: parse_var("CONTENT_CACHE_TTL", defaults.content_cache_ttl),
            content_cache_max_entries: parse_var(
                "CONTENT_CACHE_MAX_ENTRIES",
                defaults.content_cache_max_entries,
            ),
            cleanup_interval: parse_var("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            pricing_api_url: "http://127.0.0.1:8081".to_string(),
            auth_url: "http://127.0.0.1:8081/oauth2/token".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            auth_scope: "ccds.read".to_string(),
            tenant_mapping: "walkerrx".to_string(),
            token_safety_margin: 60,
            default_origin: Coordinates {
                latitude: 30.4015,
                longitude: -97.7527,
            },
            upstream_timeout: 30,
            proxy_target_url: None,
            proxy_allowed_paths: Vec::new(),
            wordpress_api_url: None,
            wordpress_auth_token: None,
            content_cache_ttl: 3600,
            content_cache_max_entries: 256,
            cleanup_interval: 60,
        }
    }
}

/// Reads a non-empty string variable.
fn string_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reads and parses a variable, falling back to `default` when unset or malformed.
fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
