//! Medication records returned by search and details endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::models::DrugPriceSheet;

/// A medication as exposed to clients.
///
/// Identity is the drug name; none of the other fields are guaranteed unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub drug_id: String,
    pub drug_name: String,
    pub generic_name: String,
    pub brand_name: String,
    pub dosage_form: String,
    pub strength: String,
    pub package_size: String,
    pub ndc: String,
    pub gsn: String,
    pub is_generic: bool,
}

impl Medication {
    /// Builds a record from a bare drug name returned by the prefix search.
    pub fn from_name(index: usize, name: &str) -> Self {
        Self {
            drug_id: format!("drug-{}", index),
            drug_name: name.to_string(),
            generic_name: String::new(),
            brand_name: name.to_string(),
            dosage_form: String::new(),
            strength: String::new(),
            package_size: String::new(),
            ndc: String::new(),
            gsn: String::new(),
            is_generic: false,
        }
    }

    /// Builds a record from a loosely-typed upstream object.
    pub fn from_record(record: &Value) -> Self {
        let gsn = text_field(record, "gsn");
        let drug_id = Some(text_field(record, "drugId"))
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| gsn.clone());

        Self {
            drug_id,
            drug_name: text_field(record, "drugName"),
            generic_name: text_field(record, "genericName"),
            brand_name: text_field(record, "brandName"),
            dosage_form: text_field(record, "dosageForm"),
            strength: text_field(record, "strength"),
            package_size: text_field(record, "packageSize"),
            ndc: text_field(record, "ndc"),
            gsn,
            is_generic: truthy(record.get("isGeneric")),
        }
    }

    /// Summarises a price sheet's headline drug with its default form and strength.
    pub fn from_price_sheet(sheet: &DrugPriceSheet) -> Option<Self> {
        let drug = sheet.drug.as_ref()?;
        let form = sheet
            .forms
            .iter()
            .find(|f| f.selected)
            .or_else(|| sheet.forms.first());
        let strength = sheet
            .strengths
            .iter()
            .find(|s| s.selected)
            .or_else(|| sheet.strengths.first());
        let is_generic = drug.bg_flag.eq_ignore_ascii_case("G");

        Some(Self {
            drug_id: drug.gsn.to_string(),
            drug_name: drug.med_name.clone(),
            generic_name: if is_generic {
                drug.med_name.clone()
            } else {
                String::new()
            },
            brand_name: if is_generic {
                String::new()
            } else {
                drug.med_name.clone()
            },
            dosage_form: form.map(|f| f.form.clone()).unwrap_or_default(),
            strength: strength.map(|s| s.strength.clone()).unwrap_or_default(),
            package_size: drug.quantity.map(|q| q.to_string()).unwrap_or_default(),
            ndc: String::new(),
            gsn: drug.gsn.to_string(),
            is_generic,
        })
    }
}

/// Normalizes the three shapes the drug-name search has been seen to return.
///
/// - a list of names
/// - a list of records
/// - an object wrapping records in `results`
pub fn normalize_search_payload(payload: &Value) -> Vec<Medication> {
    let records = match payload {
        Value::Array(items) if !items.is_empty() => items,
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(items)) => items,
            _ => {
                warn!(payload = %payload, "Unexpected drug search response format");
                return Vec::new();
            }
        },
        Value::Array(_) => return Vec::new(),
        other => {
            warn!(payload = %other, "Unexpected drug search response format");
            return Vec::new();
        }
    };

    match records.first() {
        Some(Value::String(_)) => records
            .iter()
            .filter_map(Value::as_str)
            .enumerate()
            .map(|(i, name)| Medication::from_name(i, name))
            .collect(),
        _ => records
            .iter()
            .filter(|r| r.is_object())
            .map(Medication::from_record)
            .collect(),
    }
}

fn text_field(record: &Value, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        _ => false,
    }
}
