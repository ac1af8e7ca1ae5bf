//! WordPress Content Client
//!
//! GraphQL queries against the wellness site, cached in a [`TtlStore`].
//! Any failure is logged and degrades to an empty result.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, TtlStore};
use crate::config::Config;
use crate::content::{Discount, Post};
use crate::error::{GatewayError, Result};

const POSTS_QUERY: &str = "query GetPosts { posts(first: 10) { nodes { id title slug excerpt content date featuredImage { node { sourceUrl altText } } } } }";

const DISCOUNTS_QUERY: &str = "query GetDiscounts { discounts(first: 20) { nodes { id title slug content featuredImage { node { sourceUrl altText } } discountMeta { discountCode discountAmount expiryDate terms } } } }";

const POST_BY_SLUG_QUERY: &str = "query GetPostBySlug($slug: ID!) { post(id: $slug, idType: SLUG) { id title content date featuredImage { node { sourceUrl altText } } } }";

#[derive(Debug, Deserialize)]
struct Nodes<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<T>,
}

// == Content Client ==
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    endpoint: Option<String>,
    auth_token: Option<String>,
    /// GraphQL `data` objects keyed by query
    cache: Arc<RwLock<TtlStore<Value>>>,
}

impl ContentClient {
    pub fn new(
        http: reqwest::Client,
        endpoint: Option<String>,
        auth_token: Option<String>,
        cache: TtlStore<Value>,
    ) -> Self {
        Self {
            http,
            endpoint,
            auth_token,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    pub fn from_config(config: &Config, http: reqwest::Client) -> Self {
        Self::new(
            http,
            config.wordpress_api_url.clone(),
            config.wordpress_auth_token.clone(),
            TtlStore::new(config.content_cache_max_entries, config.content_cache_ttl),
        )
    }

    /// Shared handle for the background cleanup task.
    pub fn cache(&self) -> Arc<RwLock<TtlStore<Value>>> {
        Arc::clone(&self.cache)
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    /// Latest 10 posts.
    pub async fn posts(&self) -> Vec<Post> {
        match self.nodes::<Post>("posts", POSTS_QUERY).await {
            Ok(posts) => posts,
            Err(e) => {
                warn!(error = %e, "Failed to fetch posts");
                Vec::new()
            }
        }
    }

    /// Latest 20 discounts.
    pub async fn discounts(&self) -> Vec<Discount> {
        match self.nodes::<Discount>("discounts", DISCOUNTS_QUERY).await {
            Ok(discounts) => discounts,
            Err(e) => {
                warn!(error = %e, "Failed to fetch discounts");
                Vec::new()
            }
        }
    }

    pub async fn post_by_slug(&self, slug: &str) -> Option<Post> {
        let key = format!("post:{}", slug);
        let data = match self
            .cached_query(&key, POST_BY_SLUG_QUERY, json!({ "slug": slug }))
            .await
        {
            Ok(data) => data,
            Err(e) => {
                warn!(slug, error = %e, "Failed to fetch post");
                return None;
            }
        };

        match data.get("post") {
            Some(Value::Null) | None => None,
            Some(post) => serde_json::from_value(post.clone())
                .map_err(|e| warn!(slug, error = %e, "Unexpected post format"))
                .ok(),
        }
    }

    async fn nodes<T: DeserializeOwned>(&self, field: &str, query: &str) -> Result<Vec<T>> {
        let data = self.cached_query(field, query, json!({})).await?;
        match data.get(field) {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(connection) => serde_json::from_value::<Nodes<T>>(connection.clone())
                .map(|c| c.nodes)
                .map_err(|e| GatewayError::InvalidResponse(format!("Unexpected {} format: {}", field, e))),
        }
    }

    async fn cached_query(&self, key: &str, query: &str, variables: Value) -> Result<Value> {
        if let Some(data) = self.cache.write().await.get(key) {
            debug!(key, "Content cache hit");
            return Ok(data);
        }

        let data = self.execute(query, variables).await?;
        self.cache.write().await.set(key, data.clone(), None);
        Ok(data)
    }

    async fn execute(&self, query: &str, variables: Value) -> Result<Value> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| GatewayError::Unavailable("Content API is not configured".to_string()))?;

        info!(endpoint, "Querying content API");
        let mut request = self
            .http
            .post(endpoint)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = &self.auth_token {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }

        let response = request.send().await.map_err(|source| GatewayError::Transport {
            context: "Failed to reach content API",
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Upstream {
                operation: "Content query",
                status,
                body,
            });
        }

        let mut payload: Value = response.json().await.map_err(|_| {
            GatewayError::InvalidResponse("Invalid response format from content API".to_string())
        })?;

        if let Some(errors) = payload.get("errors").and_then(Value::as_array) {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect();
            return Err(GatewayError::InvalidResponse(format!(
                "GraphQL errors: {}",
                messages.join("; ")
            )));
        }

        match payload.get_mut("data") {
            Some(data) if data.is_object() => Ok(data.take()),
            _ => Err(GatewayError::InvalidResponse(
                "Content API response has no data".to_string(),
            )),
        }
    }
}
