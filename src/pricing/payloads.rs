//! Outbound request bodies for the pricing API.

use serde::{Deserialize, Serialize};

/// Brand/generic flag sent for every multi-drug entry
const GENERIC_FLAG: &str = "G";

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Optional quantity override. Absent or zero quantities are not sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customized_quantity: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl QuantityOverride {
    pub fn new(quantity: Option<u32>) -> Self {
        match quantity.filter(|q| *q > 0) {
            Some(q) => Self {
                customized_quantity: Some(true),
                quantity: Some(q),
            },
            None => Self::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugNamesRequest<'a> {
    pub hq_mapping_name: &'a str,
    pub prefix_text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceByNameRequest<'a> {
    pub hq_mapping_name: &'a str,
    pub drug_name: &'a str,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceByGsnRequest<'a> {
    pub hq_mapping_name: &'a str,
    pub gsn: u64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub quantity: QuantityOverride,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceByNdcRequest<'a> {
    pub hq_mapping_name: &'a str,
    pub ndc_code: u64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub quantity: QuantityOverride,
}

/// One entry of a multi-drug lookup, keyed by name or GSN.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiDrugItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drug_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gsn: Option<u64>,
    pub brand_generic_flag: &'static str,
    #[serde(flatten)]
    pub quantity: QuantityOverride,
}

impl MultiDrugItem {
    pub fn by_name(name: &str, quantity: Option<u32>) -> Self {
        Self {
            drug_name: Some(name.to_string()),
            gsn: None,
            brand_generic_flag: GENERIC_FLAG,
            quantity: QuantityOverride::new(quantity),
        }
    }

    pub fn by_gsn(gsn: u64, quantity: Option<u32>) -> Self {
        Self {
            drug_name: None,
            gsn: Some(gsn),
            brand_generic_flag: GENERIC_FLAG,
            quantity: QuantityOverride::new(quantity),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiDrugRequest<'a> {
    pub hq_mapping_name: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub drug_list: Vec<MultiDrugItem>,
}

/// Pairs each drug with the quantity at the same index, if any.
pub fn quantity_at(quantities: &[Option<u32>], index: usize) -> Option<u32> {
    quantities.get(index).copied().flatten()
}
