//! API Module
//!
//! HTTP handlers and routing for the gateway REST API.
//!
//! # Endpoints
//! - `/api/medications/...` - Search, pricing and selection options
//! - `GET /api/pharmacies` - Nearby pharmacies
//! - `/api/content/...` - Wellness site posts and discounts
//! - `GET|POST /api/proxy/*path` - Allow-listed reverse proxy
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod content;
pub mod handlers;
pub mod medications;
pub mod pharmacies;
pub mod proxy;
pub mod routes;

pub use handlers::*;
pub use proxy::ProxyTarget;
pub use routes::create_router;
