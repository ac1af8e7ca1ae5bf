//! Medication Handlers
//!
//! Search, pricing and drug-selection endpoints under `/api/medications`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::api::AppState;
use crate::error::{GatewayError, Result};
use crate::models::{
    DrugNameParams, DrugPriceSheet, GsnParams, GsnPricingParams, Medication,
    MultiPricingByGsnRequest, MultiPricingByNameRequest, NdcPricingParams, OptionsParams,
    PricingParams, RawResultsResponse, SearchParams, SearchResponse,
};
use crate::selection::{derive_options, AvailableOptions, Selection};

const PRICING_FAILED: &str = "Failed to get medication pricing";

/// Handler for GET /api/medications/search
///
/// Prefix search normalized into medication records.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    let term = params.validate()?;
    let results = state
        .pricing
        .search_medications(term)
        .await
        .map_err(GatewayError::into_internal)?;

    Ok(Json(SearchResponse::new(results)))
}

/// Handler for GET /api/medications/names
///
/// Raw upstream name search; upstream errors keep their status.
pub async fn names_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<RawResultsResponse>> {
    let term = params.validate_names()?;
    let results = state.pricing.search_drug_names(term).await?;
    Ok(Json(RawResultsResponse { results }))
}

/// Handler for GET /api/medications/drugprices/byName
pub async fn prices_by_name_handler(
    State(state): State<AppState>,
    Query(params): Query<DrugNameParams>,
) -> Result<Json<Value>> {
    let drug_name = params.validate()?;
    let prices = state
        .pricing
        .price_by_name(drug_name, state.pricing.origin())
        .await?;
    Ok(Json(prices))
}

/// Handler for GET /api/medications/drugprices/byGSN
pub async fn prices_by_gsn_handler(
    State(state): State<AppState>,
    Query(params): Query<GsnParams>,
) -> Result<Json<Value>> {
    let gsn = params.validate()?;
    let prices = state
        .pricing
        .price_by_gsn(gsn, state.pricing.origin(), None)
        .await?;
    Ok(Json(prices))
}

/// Handler for GET /api/medications/:drugName
///
/// Builds a medication summary from the drug's price sheet.
pub async fn medication_handler(
    State(state): State<AppState>,
    Path(drug_name): Path<String>,
) -> Result<Json<Medication>> {
    let drug_name = require_drug_name(&drug_name)?;
    let sheet = state
        .pricing
        .price_sheet(drug_name)
        .await
        .map_err(|e| match e {
            GatewayError::Upstream {
                status: StatusCode::NOT_FOUND,
                ..
            } => not_found(),
            other => other.into_internal(),
        })?;

    Medication::from_price_sheet(&sheet)
        .map(Json)
        .ok_or_else(not_found)
}

/// Handler for GET /api/medications/:drugName/pricing
pub async fn pricing_handler(
    State(state): State<AppState>,
    Path(drug_name): Path<String>,
    Query(params): Query<PricingParams>,
) -> Result<Json<Value>> {
    let drug_name = require_drug_name(&drug_name)?;
    let (zip_code, radius) = params.validate()?;
    debug!(drug_name, zip_code, radius, "Pricing by name near ZIP");

    let location = state.pricing.locate(zip_code);
    let prices = state
        .pricing
        .price_by_name(drug_name, location)
        .await
        .map_err(|e| e.masked(PRICING_FAILED))?;
    Ok(Json(prices))
}

/// Handler for GET /api/medications/:drugName/options
///
/// Derives the variant, form, strength and quantity dropdowns for a selection.
pub async fn options_handler(
    State(state): State<AppState>,
    Path(drug_name): Path<String>,
    Query(params): Query<OptionsParams>,
) -> Result<Json<AvailableOptions>> {
    let drug_name = require_drug_name(&drug_name)?;
    let selection = params.into_selection();
    let mut sheet = state
        .pricing
        .price_sheet(drug_name)
        .await
        .map_err(GatewayError::into_internal)?;

    // A different variant carries its own forms, strengths and quantities.
    if let Some(variant) = variant_to_fetch(&sheet, drug_name, &selection) {
        debug!(drug_name, variant, "Fetching price sheet for selected variant");
        let variant_sheet = state
            .pricing
            .price_sheet(variant)
            .await
            .map_err(GatewayError::into_internal)?;
        sheet = variant_sheet.with_alternates_from(sheet);
    }

    Ok(Json(derive_options(&sheet, &selection)))
}

/// The requested variant when it is another entry of the sheet's alternates.
fn variant_to_fetch<'a>(
    sheet: &DrugPriceSheet,
    drug_name: &str,
    selection: &'a Selection,
) -> Option<&'a str> {
    let variant = selection.variant.as_deref()?;
    let offered = sheet.alternate_drugs.iter().any(|v| v.med_name == variant);
    (offered && !variant.eq_ignore_ascii_case(drug_name)).then_some(variant)
}

/// Handler for GET /api/medications/pricing/gsn
pub async fn gsn_pricing_handler(
    State(state): State<AppState>,
    Query(params): Query<GsnPricingParams>,
) -> Result<Json<Value>> {
    let lookup = params.validate()?;
    let location = state.pricing.locate(lookup.zip_code);
    let prices = state
        .pricing
        .price_by_gsn(lookup.code, location, lookup.quantity)
        .await
        .map_err(|e| e.masked(PRICING_FAILED))?;
    Ok(Json(prices))
}

/// Handler for GET /api/medications/pricing/ndc
pub async fn ndc_pricing_handler(
    State(state): State<AppState>,
    Query(params): Query<NdcPricingParams>,
) -> Result<Json<Value>> {
    let lookup = params.validate()?;
    let location = state.pricing.locate(lookup.zip_code);
    let prices = state
        .pricing
        .price_by_ndc(lookup.code, location, lookup.quantity)
        .await
        .map_err(|e| e.masked(PRICING_FAILED))?;
    Ok(Json(prices))
}

/// Handler for POST /api/medications/multi-pricing/name
pub async fn multi_pricing_by_name_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<MultiPricingByNameRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(body) = payload.map_err(|e| GatewayError::Validation(e.body_text()))?;
    let (drug_names, zip_code) = body.validate()?;
    let quantities = body.quantities.as_deref().unwrap_or_default();

    let location = state.pricing.locate(zip_code);
    let prices = state
        .pricing
        .multi_price_by_name(drug_names, location, quantities)
        .await
        .map_err(GatewayError::into_internal)?;
    Ok(Json(prices))
}

/// Handler for POST /api/medications/multi-pricing/gsn
pub async fn multi_pricing_by_gsn_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<MultiPricingByGsnRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(body) = payload.map_err(|e| GatewayError::Validation(e.body_text()))?;
    let (gsns, zip_code) = body.validate()?;
    let quantities = body.quantities.as_deref().unwrap_or_default();

    let location = state.pricing.locate(zip_code);
    let prices = state
        .pricing
        .multi_price_by_gsn(gsns, location, quantities)
        .await
        .map_err(GatewayError::into_internal)?;
    Ok(Json(prices))
}

fn require_drug_name(raw: &str) -> Result<&str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(GatewayError::Validation("Drug name is required".to_string()));
    }
    Ok(name)
}

fn not_found() -> GatewayError {
    GatewayError::NotFound("No medication found with that name".to_string())
}
