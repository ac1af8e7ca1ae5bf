//! Error types for the gateway
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

// == Gateway Error Enum ==
/// Unified error type for the gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Missing or malformed request parameters
    #[error("{0}")]
    Validation(String),

    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Proxy path outside the configured allow-list
    #[error("{0}")]
    Forbidden(String),

    /// Feature not configured on this deployment
    #[error("{0}")]
    Unavailable(String),

    /// Client-credentials exchange returned a non-2xx status
    #[error("Authentication failed: {status}")]
    Auth { status: StatusCode, body: String },

    /// Pricing API returned a non-2xx status
    #[error("{operation} failed: {status}")]
    Upstream {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },

    /// Network failure talking to an upstream service
    #[error("{context}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with something we could not parse
    #[error("{0}")]
    InvalidResponse(String),

    /// Internal server error
    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    /// Collapses every non-client error into a 500 carrying its own message.
    pub fn into_internal(self) -> Self {
        match self {
            err @ (GatewayError::Validation(_) | GatewayError::NotFound(_)) => err,
            other => {
                error!(error = %other, "request failed");
                GatewayError::Internal(other.to_string())
            }
        }
    }

    /// Collapses every non-client error into a 500 carrying a fixed message.
    pub fn masked(self, message: &str) -> Self {
        match self {
            err @ (GatewayError::Validation(_) | GatewayError::NotFound(_)) => err,
            other => {
                error!(error = %other, "{}", message);
                GatewayError::Internal(message.to_string())
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            GatewayError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            GatewayError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            GatewayError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            GatewayError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            GatewayError::Auth { .. } => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            GatewayError::Upstream { status, body, .. } => {
                let message = if body.trim().is_empty() {
                    self.to_string()
                } else {
                    body.clone()
                };
                (*status, message)
            }
            GatewayError::Transport { context, .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
            }
            GatewayError::InvalidResponse(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            GatewayError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the gateway.
pub type Result<T> = std::result::Result<T, GatewayError>;
