//! Typed view of the price-by-name payload used for option selection.
//!
//! Only the fields the selection cascade reads are modelled; everything else
//! in the upstream payload is ignored.

use serde::{Deserialize, Deserializer, Serialize};

/// Headline drug of a price sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugSummary {
    pub med_name: String,
    /// "G" for generic, "B" for brand
    #[serde(default, deserialize_with = "null_as_default")]
    pub bg_flag: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gsn: u64,
    #[serde(default)]
    pub quantity: Option<f64>,
}

/// A brand or generic alternative offered for the searched drug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternateDrug {
    pub med_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bg_flag: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gsn: Option<u64>,
}

impl AlternateDrug {
    pub fn is_brand(&self) -> bool {
        self.bg_flag.eq_ignore_ascii_case("B")
    }

    /// Dropdown label, e.g. `TYLENOL (brand)`.
    pub fn label(&self) -> String {
        let kind = if self.bg_flag.eq_ignore_ascii_case("G") {
            "generic"
        } else {
            "brand"
        };
        format!("{} ({})", self.med_name, kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOption {
    pub form: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gsn: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthOption {
    pub strength: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gsn: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityOption {
    pub quantity: f64,
    /// Unit of measure, e.g. `TABLET` or `ML`
    #[serde(default, deserialize_with = "null_as_default")]
    pub uom: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gsn: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
}

impl QuantityOption {
    /// Dropdown label, e.g. `30 TABLET`.
    pub fn label(&self) -> String {
        format!("{} {}", self.quantity, self.uom)
    }
}

/// Upstream sends explicit `null` for fields it has no value for.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Price-by-name payload reduced to the selection inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugPriceSheet {
    #[serde(default)]
    pub drug: Option<DrugSummary>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub forms: Vec<FormOption>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub strengths: Vec<StrengthOption>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantities: Vec<QuantityOption>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alternate_drugs: Vec<AlternateDrug>,
}

impl DrugPriceSheet {
    /// This sheet's forms, strengths and quantities under `parent`'s variant
    /// list, for a variant fetched on its own after being picked from `parent`.
    pub fn with_alternates_from(self, parent: DrugPriceSheet) -> Self {
        Self {
            alternate_drugs: parent.alternate_drugs,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sheet_ignores_unknown_fields() {
        let sheet: DrugPriceSheet = serde_json::from_value(json!({
            "drug": {"medName": "TYLENOL", "bgFlag": "B", "gsn": 4489, "quantity": 30},
            "forms": [{"form": "TABLET", "gsn": 4489, "selected": true, "rank": 1}],
            "strengths": [],
            "quantities": [{"quantity": 30, "uom": "TABLET", "gsn": 4489, "selected": true}],
            "alternateDrugs": [{"medName": "ACETAMINOPHEN", "bgFlag": "G", "selected": false}],
            "pharmacyPricings": [{"price": 4.5}]
        }))
        .unwrap();

        assert_eq!(sheet.drug.unwrap().med_name, "TYLENOL");
        assert_eq!(sheet.forms[0].rank, Some(1));
        assert_eq!(sheet.quantities[0].label(), "30 TABLET");
        assert_eq!(sheet.alternate_drugs[0].label(), "ACETAMINOPHEN (generic)");
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let sheet: DrugPriceSheet = serde_json::from_value(json!({})).unwrap();
        assert!(sheet.drug.is_none());
        assert!(sheet.forms.is_empty());

        let sheet: DrugPriceSheet =
            serde_json::from_value(json!({"forms": null, "alternateDrugs": null})).unwrap();
        assert!(sheet.forms.is_empty());
        assert!(sheet.alternate_drugs.is_empty());
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let sheet: DrugPriceSheet = serde_json::from_value(json!({
            "drug": {"medName": "TYLENOL", "bgFlag": null, "gsn": null},
            "forms": [{"form": "TABLET", "gsn": null, "selected": null}],
            "strengths": [{"strength": "500 mg", "gsn": null}],
            "quantities": [{"quantity": 30, "uom": null, "gsn": null}],
            "alternateDrugs": [{"medName": "TYLENOL", "bgFlag": null, "selected": null, "gsn": null}]
        }))
        .unwrap();

        assert_eq!(sheet.drug.unwrap().gsn, 0);
        assert_eq!(sheet.forms[0].gsn, 0);
        assert!(!sheet.forms[0].selected);
        assert_eq!(sheet.strengths[0].gsn, 0);
        assert_eq!(sheet.quantities[0].uom, "");
        assert_eq!(sheet.alternate_drugs[0].bg_flag, "");
        assert_eq!(sheet.alternate_drugs[0].gsn, None);
    }

    #[test]
    fn test_variant_sheet_keeps_parent_alternates() {
        let parent: DrugPriceSheet = serde_json::from_value(json!({
            "alternateDrugs": [
                {"medName": "ACETAMINOPHEN", "bgFlag": "G", "selected": true},
                {"medName": "MAPAP", "bgFlag": "B"}
            ],
            "forms": [{"form": "TABLET", "gsn": 4489}]
        }))
        .unwrap();
        let variant: DrugPriceSheet = serde_json::from_value(json!({
            "alternateDrugs": [{"medName": "MAPAP", "bgFlag": "G"}],
            "forms": [{"form": "CAPSULE", "gsn": 4495}]
        }))
        .unwrap();

        let merged = variant.with_alternates_from(parent);
        assert_eq!(merged.forms[0].form, "CAPSULE");
        assert_eq!(merged.alternate_drugs.len(), 2);
        assert!(merged.alternate_drugs[1].is_brand());
    }

    #[test]
    fn test_brand_label() {
        let alt = AlternateDrug {
            med_name: "FEVERALL".into(),
            bg_flag: "B".into(),
            selected: false,
            gsn: None,
        };
        assert!(alt.is_brand());
        assert_eq!(alt.label(), "FEVERALL (brand)");
    }
}
