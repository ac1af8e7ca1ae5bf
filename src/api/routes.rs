//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::content::{discounts_handler, post_handler, posts_handler};
use super::handlers::{health_handler, stats_handler, AppState};
use super::medications::{
    gsn_pricing_handler, medication_handler, multi_pricing_by_gsn_handler,
    multi_pricing_by_name_handler, names_handler, ndc_pricing_handler, options_handler,
    prices_by_gsn_handler, prices_by_name_handler, pricing_handler, search_handler,
};
use super::pharmacies::pharmacies_handler;
use super::proxy::{proxy_handler, PROXY_PREFIX};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin, method and header
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let medications = Router::new()
        .route("/search", get(search_handler))
        .route("/names", get(names_handler))
        .route("/drugprices/byName", get(prices_by_name_handler))
        .route("/drugprices/byGSN", get(prices_by_gsn_handler))
        .route("/pricing/gsn", get(gsn_pricing_handler))
        .route("/pricing/ndc", get(ndc_pricing_handler))
        .route("/multi-pricing/name", post(multi_pricing_by_name_handler))
        .route("/multi-pricing/gsn", post(multi_pricing_by_gsn_handler))
        .route("/:drugName", get(medication_handler))
        .route("/:drugName/pricing", get(pricing_handler))
        .route("/:drugName/options", get(options_handler));

    let content = Router::new()
        .route("/posts", get(posts_handler))
        .route("/posts/:slug", get(post_handler))
        .route("/discounts", get(discounts_handler));

    Router::new()
        .nest("/api/medications", medications)
        .nest("/api/content", content)
        .route("/api/pharmacies", get(pharmacies_handler))
        .route(PROXY_PREFIX, get(proxy_handler).post(proxy_handler))
        .route(&format!("{}/*path", PROXY_PREFIX), get(proxy_handler).post(proxy_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
