//! Rx Gateway - pharmacy price-comparison backend
//!
//! Fronts a drug-pricing API with a cached client-credentials token, exposes
//! validated medication and pharmacy endpoints, an allow-listed reverse proxy
//! and the wellness site's content feed.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod models;
pub mod pricing;
pub mod selection;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{GatewayError, Result};
pub use tasks::spawn_cleanup_task;
