//! Pharmacy Handlers

use axum::{
    extract::{Query, State},
    Json,
};

use crate::api::AppState;
use crate::error::Result;
use crate::models::{PharmaciesResponse, PharmacyParams};

/// Handler for GET /api/pharmacies
///
/// Nearby pharmacies for a ZIP code, `count` defaulting to 5.
pub async fn pharmacies_handler(
    State(state): State<AppState>,
    Query(params): Query<PharmacyParams>,
) -> Result<Json<PharmaciesResponse>> {
    let (zip_code, count) = params.validate()?;
    let location = state.pricing.locate(zip_code);
    let pharmacies = state
        .pricing
        .nearby_pharmacies(location, count)
        .await
        .map_err(|e| e.masked("Failed to get nearby pharmacies"))?;

    Ok(Json(PharmaciesResponse { pharmacies }))
}
