//! Request DTOs for the gateway API
//!
//! Query strings and JSON bodies accepted by the route handlers. Every field is
//! optional at the serde level so that missing parameters surface as a 400 with
//! a descriptive message instead of an extractor rejection.

use serde::Deserialize;

use crate::error::{GatewayError, Result};
use crate::selection::Selection;

/// Minimum number of characters in a drug-name search
pub const MIN_SEARCH_LENGTH: usize = 3;

/// Pharmacies returned when `count` is absent
pub const DEFAULT_PHARMACY_COUNT: u32 = 5;

/// Search radius in miles when `radius` is absent
pub const DEFAULT_RADIUS_MILES: u32 = 10;

/// Query for `GET /api/medications/search` and `/names`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

impl SearchParams {
    /// Returns the trimmed search term.
    pub fn validate(&self) -> Result<&str> {
        self.validate_term("Query parameter \"q\" is required")
    }

    /// Same rules as [`validate`](Self::validate), with the names route's wording.
    pub fn validate_names(&self) -> Result<&str> {
        self.validate_term("Search query parameter \"q\" is required")
    }

    fn validate_term(&self, missing: &str) -> Result<&str> {
        let term = self.q.as_deref().map(str::trim).unwrap_or_default();
        if term.is_empty() {
            return Err(GatewayError::Validation(missing.to_string()));
        }
        if term.chars().count() < MIN_SEARCH_LENGTH {
            return Err(GatewayError::Validation(format!(
                "Search query must be at least {} characters long",
                MIN_SEARCH_LENGTH
            )));
        }
        Ok(term)
    }
}

/// Query for `GET /api/medications/:drugName/pricing`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingParams {
    pub zip_code: Option<String>,
    pub radius: Option<String>,
}

impl PricingParams {
    /// Returns the ZIP code and search radius.
    pub fn validate(&self) -> Result<(&str, u32)> {
        let zip = require_zip(self.zip_code.as_deref())?;
        let radius = parse_positive(self.radius.as_deref()).unwrap_or(DEFAULT_RADIUS_MILES);
        Ok((zip, radius))
    }
}

/// Validated GSN or NDC pricing lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeLookup<'a> {
    pub code: u64,
    pub zip_code: &'a str,
    pub quantity: Option<u32>,
}

/// Query for `GET /api/medications/pricing/gsn`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GsnPricingParams {
    pub gsn: Option<String>,
    pub zip_code: Option<String>,
    pub quantity: Option<String>,
}

impl GsnPricingParams {
    pub fn validate(&self) -> Result<CodeLookup<'_>> {
        let raw = require(self.gsn.as_deref(), "Query parameter \"gsn\" is required")?;
        let zip_code = require_zip(self.zip_code.as_deref())?;
        let code = raw.parse().map_err(|_| {
            GatewayError::Validation("Query parameter \"gsn\" must be numeric".to_string())
        })?;

        Ok(CodeLookup {
            code,
            zip_code,
            quantity: parse_positive(self.quantity.as_deref()),
        })
    }
}

/// Query for `GET /api/medications/pricing/ndc`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NdcPricingParams {
    pub ndc: Option<String>,
    pub zip_code: Option<String>,
    pub quantity: Option<String>,
}

impl NdcPricingParams {
    /// NDCs are accepted with or without hyphens, e.g. `50580-0449-01`.
    pub fn validate(&self) -> Result<CodeLookup<'_>> {
        let raw = require(self.ndc.as_deref(), "Query parameter \"ndc\" is required")?;
        let zip_code = require_zip(self.zip_code.as_deref())?;
        let digits: String = raw.chars().filter(|c| *c != '-').collect();
        let code = digits.parse().map_err(|_| {
            GatewayError::Validation("Query parameter \"ndc\" must be numeric".to_string())
        })?;

        Ok(CodeLookup {
            code,
            zip_code,
            quantity: parse_positive(self.quantity.as_deref()),
        })
    }
}

/// Query for `GET /api/pharmacies`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyParams {
    pub zip_code: Option<String>,
    pub count: Option<String>,
}

impl PharmacyParams {
    pub fn validate(&self) -> Result<(&str, u32)> {
        let zip = require_zip(self.zip_code.as_deref())?;
        let count = parse_positive(self.count.as_deref()).unwrap_or(DEFAULT_PHARMACY_COUNT);
        Ok((zip, count))
    }
}

/// Query for `GET /api/medications/drugprices/byName`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugNameParams {
    pub drug_name: Option<String>,
}

impl DrugNameParams {
    pub fn validate(&self) -> Result<&str> {
        require(self.drug_name.as_deref(), "Drug name parameter is required")
    }
}

/// Query for `GET /api/medications/drugprices/byGSN`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GsnParams {
    pub gsn: Option<String>,
}

impl GsnParams {
    pub fn validate(&self) -> Result<u64> {
        self.gsn
            .as_deref()
            .and_then(|g| g.trim().parse().ok())
            .ok_or_else(|| GatewayError::Validation("Valid GSN parameter is required".to_string()))
    }
}

/// Query for `GET /api/medications/:drugName/options`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionsParams {
    pub variant: Option<String>,
    pub form: Option<String>,
    pub strength: Option<String>,
    pub quantity: Option<String>,
    pub uom: Option<String>,
}

impl OptionsParams {
    pub fn into_selection(self) -> Selection {
        Selection {
            variant: non_blank(self.variant),
            form: non_blank(self.form),
            strength: non_blank(self.strength),
            quantity: self.quantity.and_then(|q| q.trim().parse().ok()),
            uom: non_blank(self.uom),
        }
    }
}

/// Body for `POST /api/medications/multi-pricing/name`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiPricingByNameRequest {
    pub drug_names: Option<Vec<String>>,
    pub zip_code: Option<String>,
    #[serde(default)]
    pub quantities: Option<Vec<Option<u32>>>,
}

impl MultiPricingByNameRequest {
    pub fn validate(&self) -> Result<(&[String], &str)> {
        let names = self
            .drug_names
            .as_deref()
            .filter(|names| !names.is_empty())
            .ok_or_else(|| {
                GatewayError::Validation(
                    "Request body must include \"drugNames\" array".to_string(),
                )
            })?;
        let zip = require(
            self.zip_code.as_deref(),
            "Request body must include \"zipCode\"",
        )?;
        Ok((names, zip))
    }
}

/// Body for `POST /api/medications/multi-pricing/gsn`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiPricingByGsnRequest {
    pub gsns: Option<Vec<u64>>,
    pub zip_code: Option<String>,
    #[serde(default)]
    pub quantities: Option<Vec<Option<u32>>>,
}

impl MultiPricingByGsnRequest {
    pub fn validate(&self) -> Result<(&[u64], &str)> {
        let gsns = self
            .gsns
            .as_deref()
            .filter(|gsns| !gsns.is_empty())
            .ok_or_else(|| {
                GatewayError::Validation("Request body must include \"gsns\" array".to_string())
            })?;
        let zip = require(
            self.zip_code.as_deref(),
            "Request body must include \"zipCode\"",
        )?;
        Ok((gsns, zip))
    }
}

// == Helpers ==

fn require<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| GatewayError::Validation(message.to_string()))
}

fn require_zip(value: Option<&str>) -> Result<&str> {
    require(value, "Query parameter \"zipCode\" is required")
}

/// Parses a positive integer; zero and garbage count as absent.
fn parse_positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(q: &str) -> SearchParams {
        SearchParams {
            q: Some(q.to_string()),
        }
    }

    #[test]
    fn test_search_requires_query() {
        let err = SearchParams::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "Query parameter \"q\" is required");
        assert!(search("   ").validate().is_err());
    }

    #[test]
    fn test_search_minimum_length() {
        let err = search(" ty ").validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Search query must be at least 3 characters long"
        );
        assert_eq!(search("  tyl ").validate().unwrap(), "tyl");
    }

    #[test]
    fn test_names_query_wording() {
        let err = SearchParams::default().validate_names().unwrap_err();
        assert_eq!(err.to_string(), "Search query parameter \"q\" is required");
        assert!(search("ty").validate_names().is_err());
        assert_eq!(search(" fev ").validate_names().unwrap(), "fev");
    }

    #[test]
    fn test_pricing_requires_zip() {
        let params = PricingParams::default();
        assert!(matches!(
            params.validate(),
            Err(GatewayError::Validation(msg)) if msg.contains("zipCode")
        ));
    }

    #[test]
    fn test_pricing_radius_defaults() {
        let params = PricingParams {
            zip_code: Some("78701".into()),
            radius: Some("abc".into()),
        };
        assert_eq!(params.validate().unwrap(), ("78701", DEFAULT_RADIUS_MILES));
    }

    #[test]
    fn test_gsn_lookup() {
        let params = GsnPricingParams {
            gsn: Some("4489".into()),
            zip_code: Some("78701".into()),
            quantity: Some("0".into()),
        };
        let lookup = params.validate().unwrap();
        assert_eq!(lookup.code, 4489);
        assert_eq!(lookup.quantity, None);
    }

    #[test]
    fn test_gsn_checked_before_zip() {
        let params = GsnPricingParams::default();
        let err = params.validate().unwrap_err();
        assert_eq!(err.to_string(), "Query parameter \"gsn\" is required");
    }

    #[test]
    fn test_ndc_strips_hyphens() {
        let params = NdcPricingParams {
            ndc: Some("50580-449-01".into()),
            zip_code: Some("78701".into()),
            quantity: Some("60".into()),
        };
        let lookup = params.validate().unwrap();
        assert_eq!(lookup.code, 5058044901);
        assert_eq!(lookup.quantity, Some(60));
    }

    #[test]
    fn test_pharmacy_count_default() {
        let params = PharmacyParams {
            zip_code: Some("78701".into()),
            count: None,
        };
        assert_eq!(params.validate().unwrap().1, DEFAULT_PHARMACY_COUNT);
    }

    #[test]
    fn test_byname_gsn_validation() {
        let params = GsnParams {
            gsn: Some("abc".into()),
        };
        assert_eq!(
            params.validate().unwrap_err().to_string(),
            "Valid GSN parameter is required"
        );
    }

    #[test]
    fn test_multi_by_name_requires_names() {
        let body: MultiPricingByNameRequest =
            serde_json::from_str(r#"{"drugNames": [], "zipCode": "78701"}"#).unwrap();
        assert!(body.validate().is_err());

        let body: MultiPricingByNameRequest =
            serde_json::from_str(r#"{"drugNames": ["TYLENOL"]}"#).unwrap();
        assert_eq!(
            body.validate().unwrap_err().to_string(),
            "Request body must include \"zipCode\""
        );
    }

    #[test]
    fn test_multi_by_gsn_accepts_null_quantities() {
        let body: MultiPricingByGsnRequest = serde_json::from_str(
            r#"{"gsns": [4489, 16622], "zipCode": "78701", "quantities": [30, null]}"#,
        )
        .unwrap();
        assert!(body.validate().is_ok());
        assert_eq!(body.quantities.unwrap(), vec![Some(30), None]);
    }

    #[test]
    fn test_options_params_into_selection() {
        let params = OptionsParams {
            variant: Some(" ".into()),
            form: Some("TABLET".into()),
            strength: None,
            quantity: Some("30".into()),
            uom: Some("TABLET".into()),
        };
        let selection = params.into_selection();
        assert!(selection.variant.is_none());
        assert_eq!(selection.form.as_deref(), Some("TABLET"));
        assert_eq!(selection.quantity, Some(30.0));
    }
}
