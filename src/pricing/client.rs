//! Pricing API Client
//!
//! Builds authenticated requests against the drug-pricing API and maps
//! failures onto [`GatewayError`].

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::auth::TokenCache;
use crate::config::Config;
use crate::error::{GatewayError, Result};
use crate::models::{normalize_search_payload, DrugPriceSheet, Medication, SearchParams};
use crate::pricing::payloads::{
    quantity_at, Coordinates, DrugNamesRequest, MultiDrugItem, MultiDrugRequest,
    PriceByGsnRequest, PriceByNameRequest, PriceByNdcRequest, QuantityOverride,
};

// == Pricing Client ==
/// Authenticated client for the drug-pricing API.
#[derive(Debug)]
pub struct PricingClient {
    http: reqwest::Client,
    base_url: String,
    /// Tenant mapping name included in every request
    tenant: String,
    tokens: Arc<TokenCache>,
    origin: Coordinates,
}

impl PricingClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        tenant: impl Into<String>,
        tokens: Arc<TokenCache>,
        origin: Coordinates,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tenant: tenant.into(),
            tokens,
            origin,
        }
    }

    pub fn from_config(config: &Config, http: reqwest::Client, tokens: Arc<TokenCache>) -> Self {
        Self::new(
            http,
            config.pricing_api_url.clone(),
            config.tenant_mapping.clone(),
            tokens,
            config.default_origin,
        )
    }

    pub fn origin(&self) -> Coordinates {
        self.origin
    }

    /// Resolves a ZIP code to coordinates.
    ///
    /// There is no geocoder yet; every ZIP resolves to the configured origin.
    pub fn locate(&self, zip_code: &str) -> Coordinates {
        debug!(zip_code, origin = ?self.origin, "Resolving ZIP code to default origin");
        self.origin
    }

    // == Drug Names ==
    /// Raw prefix search; `prefix` must already be trimmed.
    pub async fn search_drug_names(&self, prefix: &str) -> Result<Value> {
        info!(prefix, "Searching drug names");
        let body = DrugNamesRequest {
            hq_mapping_name: &self.tenant,
            prefix_text: prefix,
        };
        self.post("Medication search", "/drugs/names", &body).await
    }

    /// Prefix search normalized into [`Medication`] records.
    pub async fn search_medications(&self, query: &str) -> Result<Vec<Medication>> {
        let params = SearchParams {
            q: Some(query.to_string()),
        };
        let term = params.validate()?;
        let payload = self.search_drug_names(term).await?;
        Ok(normalize_search_payload(&payload))
    }

    // == Single-Drug Pricing ==
    pub async fn price_by_name(&self, drug_name: &str, location: Coordinates) -> Result<Value> {
        info!(drug_name, "Pricing lookup by name");
        let body = PriceByNameRequest {
            hq_mapping_name: &self.tenant,
            drug_name,
            latitude: location.latitude,
            longitude: location.longitude,
        };
        self.post("Pricing lookup", "/drugprices/byName", &body)
            .await
    }

    /// Price-by-name reduced to the selection inputs.
    pub async fn price_sheet(&self, drug_name: &str) -> Result<DrugPriceSheet> {
        let payload = self.price_by_name(drug_name, self.origin()).await?;
        serde_json::from_value(payload).map_err(|e| {
            GatewayError::InvalidResponse(format!("Unexpected drug price format: {}", e))
        })
    }

    pub async fn price_by_gsn(
        &self,
        gsn: u64,
        location: Coordinates,
        quantity: Option<u32>,
    ) -> Result<Value> {
        info!(gsn, ?quantity, "Pricing lookup by GSN");
        let body = PriceByGsnRequest {
            hq_mapping_name: &self.tenant,
            gsn,
            latitude: location.latitude,
            longitude: location.longitude,
            quantity: QuantityOverride::new(quantity),
        };
        self.post("GSN pricing lookup", "/drugprices/byGSN", &body)
            .await
    }

    pub async fn price_by_ndc(
        &self,
        ndc: u64,
        location: Coordinates,
        quantity: Option<u32>,
    ) -> Result<Value> {
        info!(ndc, ?quantity, "Pricing lookup by NDC");
        let body = PriceByNdcRequest {
            hq_mapping_name: &self.tenant,
            ndc_code: ndc,
            latitude: location.latitude,
            longitude: location.longitude,
            quantity: QuantityOverride::new(quantity),
        };
        self.post("NDC pricing lookup", "/drugprices/byNdcCode", &body)
            .await
    }

    // == Multi-Drug Pricing ==
    pub async fn multi_price_by_name(
        &self,
        drug_names: &[String],
        location: Coordinates,
        quantities: &[Option<u32>],
    ) -> Result<Value> {
        let drug_list = drug_names
            .iter()
            .enumerate()
            .map(|(i, name)| MultiDrugItem::by_name(name, quantity_at(quantities, i)))
            .collect();
        self.multi_price("Multi-drug pricing by name", "/multidrugprices/byName", location, drug_list)
            .await
    }

    pub async fn multi_price_by_gsn(
        &self,
        gsns: &[u64],
        location: Coordinates,
        quantities: &[Option<u32>],
    ) -> Result<Value> {
        let drug_list = gsns
            .iter()
            .enumerate()
            .map(|(i, gsn)| MultiDrugItem::by_gsn(*gsn, quantity_at(quantities, i)))
            .collect();
        self.multi_price("Multi-drug pricing by GSN", "/multidrugprices/byGSN", location, drug_list)
            .await
    }

    async fn multi_price(
        &self,
        operation: &'static str,
        path: &str,
        location: Coordinates,
        drug_list: Vec<MultiDrugItem>,
    ) -> Result<Value> {
        info!(operation, drugs = drug_list.len(), "Multi-drug pricing lookup");
        let body = MultiDrugRequest {
            hq_mapping_name: &self.tenant,
            latitude: location.latitude,
            longitude: location.longitude,
            drug_list,
        };
        self.post(operation, path, &body).await
    }

    // == Pharmacies ==
    /// Nearby pharmacies; a payload without a `pharmacies` array yields none.
    pub async fn nearby_pharmacies(&self, location: Coordinates, count: u32) -> Result<Vec<Value>> {
        info!(count, "Nearby pharmacy lookup");
        let token = self.tokens.get().await?;
        let request = self
            .http
            .get(self.url("/pharmacies"))
            .bearer_auth(token)
            .query(&[
                ("lat", location.latitude.to_string()),
                ("long", location.longitude.to_string()),
                ("hqmappingName", self.tenant.clone()),
                ("pharmacyCount", count.to_string()),
            ]);

        let payload = self.execute("Pharmacy lookup", request).await?;
        Ok(match payload.get("pharmacies") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        })
    }

    // == Transport ==
    async fn post<B: Serialize>(&self, operation: &'static str, path: &str, body: &B) -> Result<Value> {
        let token = self.tokens.get().await?;
        let request = self.http.post(self.url(path)).bearer_auth(token).json(body);
        self.execute(operation, request).await
    }

    async fn execute(&self, operation: &'static str, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request
            .send()
            .await
            .map_err(|source| {
                error!(operation, error = %source, "Pricing API unreachable");
                GatewayError::Transport {
                    context: "Failed to reach pricing API",
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(operation, %status, body = %body, "Pricing API returned an error");
            return Err(GatewayError::Upstream {
                operation,
                status,
                body,
            });
        }

        response.json::<Value>().await.map_err(|e| {
            error!(operation, error = %e, "Pricing API returned invalid JSON");
            GatewayError::InvalidResponse("Invalid response format from pricing API".to_string())
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
