//! Generic Reverse Proxy
//!
//! Forwards `/api/proxy/*path` to a single configured target. Status, body and
//! content type come back from the target unchanged.
//!
//! The path suffix is taken from the request URI still percent-encoded and the
//! allow-list is checked against the normalized outbound URL, so encoded dot
//! segments cannot climb out of an allowed prefix.

use axum::{
    body::Bytes,
    extract::{OriginalUri, RawQuery, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderMap, HeaderValue, Method,
    },
    response::{IntoResponse, Response},
};
use reqwest::Url;
use tracing::{debug, error, warn};

use crate::api::AppState;
use crate::config::Config;
use crate::error::{GatewayError, Result};

/// Route prefix the proxy is mounted under
pub const PROXY_PREFIX: &str = "/api/proxy";

const DEFAULT_CONTENT_TYPE: &str = "application/json";

// == Proxy Target ==
/// Where the proxy may forward to.
#[derive(Debug, Clone, Default)]
pub struct ProxyTarget {
    base_url: Option<String>,
    /// Path prefixes without leading slash; empty allows any path
    allowed_paths: Vec<String>,
}

impl ProxyTarget {
    pub fn new(base_url: Option<String>, allowed_paths: Vec<String>) -> Self {
        Self {
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
            allowed_paths: allowed_paths
                .into_iter()
                .map(|p| p.trim_start_matches('/').to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.proxy_target_url.clone(),
            config.proxy_allowed_paths.clone(),
        )
    }

    /// Builds the outbound URL from a still-encoded path suffix, appending the
    /// raw query string unchanged.
    pub fn resolve(&self, raw_path: &str, query: Option<&str>) -> Result<Url> {
        let base = self.base_url.as_deref().ok_or_else(|| {
            GatewayError::Unavailable("Proxy target is not configured".to_string())
        })?;
        let base = Url::parse(base).map_err(|e| {
            error!(base, error = %e, "Proxy target is not a valid URL");
            GatewayError::Unavailable("Proxy target is not configured".to_string())
        })?;

        let raw_path = raw_path.trim_start_matches('/');
        if raw_path.split(|c| c == '/' || c == '\\').any(is_parent_segment) {
            return Err(GatewayError::Validation("Invalid proxy path".to_string()));
        }

        let mut url = Url::parse(&format!("{}/{}", base.as_str().trim_end_matches('/'), raw_path))
            .map_err(|_| GatewayError::Validation("Invalid proxy path".to_string()))?;

        let relative = relative_path(&base, &url).ok_or_else(|| {
            warn!(path = raw_path, "Proxy path escapes the target");
            forbidden()
        })?;
        if !self.allows(relative) {
            warn!(path = relative, "Proxy path outside allow-list");
            return Err(forbidden());
        }

        url.set_query(query.filter(|q| !q.is_empty()));
        Ok(url)
    }

    fn allows(&self, path: &str) -> bool {
        self.allowed_paths.is_empty()
            || self.allowed_paths.iter().any(|prefix| {
                path == prefix.as_str()
                    || (prefix.ends_with('/') && path.starts_with(prefix.as_str()))
                    || path
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            })
    }
}

/// `..` in any spelling the URL parser treats as a parent segment.
fn is_parent_segment(segment: &str) -> bool {
    let lowered = segment.to_ascii_lowercase();
    matches!(lowered.as_str(), ".." | ".%2e" | "%2e." | "%2e%2e")
}

/// The normalized path of `url` below the base path, without leading slash.
fn relative_path<'a>(base: &Url, url: &'a Url) -> Option<&'a str> {
    if url.origin() != base.origin() {
        return None;
    }
    let base_path = base.path().trim_end_matches('/');
    let rest = url.path().strip_prefix(base_path)?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix('/')
}

fn forbidden() -> GatewayError {
    GatewayError::Forbidden("Path is not allowed through the proxy".to_string())
}

/// Handler for GET|POST /api/proxy and /api/proxy/*path
pub async fn proxy_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let raw_path = uri.path().strip_prefix(PROXY_PREFIX).unwrap_or_default();
    let url = state.proxy.resolve(raw_path, query.as_deref())?;
    debug!(%method, url = %url, "Proxying request");

    let content_type = headers
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    let mut request = state
        .http
        .request(method.clone(), url.clone())
        .header(CONTENT_TYPE, content_type);
    if let Some(authorization) = headers.get(AUTHORIZATION) {
        request = request.header(AUTHORIZATION, authorization.clone());
    }
    if method == Method::POST {
        request = request.body(body);
    }

    let response = request.send().await.map_err(|source| {
        error!(url = %url, error = %source, "Proxy request failed");
        GatewayError::Transport {
            context: "Failed to proxy request to API",
            source,
        }
    })?;

    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    let bytes = response.bytes().await.map_err(|source| GatewayError::Transport {
        context: "Failed to proxy request to API",
        source,
    })?;

    Ok((status, [(CONTENT_TYPE, content_type)], bytes).into_response())
}
