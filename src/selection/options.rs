//! Option cascade for the variant → form → strength → quantity dropdowns.
//!
//! The GSN prefix and unit-of-measure matching below mirror what the pricing
//! API has been observed to return for a handful of drugs. They are not an
//! upstream contract and may mis-group forms for medications outside that sample.

use serde::{Deserialize, Serialize};

use crate::models::{AlternateDrug, DrugPriceSheet, FormOption, QuantityOption, StrengthOption};

/// Number of leading GSN digits that group strengths under a form
const GSN_FAMILY_DIGITS: usize = 3;

/// Brands known to ship only in a subset of the forms the sheet lists.
const BRAND_FORM_WHITELIST: &[(&str, &[&str])] = &[
    ("FEVERALL", &["SUPP.RECT"]),
    ("TYLENOL", &["TABLET", "TABLET ER", "CAPSULE"]),
    ("CHILDREN'S TYLENOL", &["LIQUID", "ORAL SUSP", "CHEWABLE"]),
    ("MAPAP", &["TABLET", "CAPSULE", "LIQUID"]),
];

/// The user's current choices. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub variant: Option<String>,
    pub form: Option<String>,
    pub strength: Option<String>,
    pub quantity: Option<f64>,
    pub uom: Option<String>,
}

/// Every dropdown's entries plus the entry chosen in each.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableOptions {
    pub variants: Vec<AlternateDrug>,
    /// `<medName> (generic)` / `<medName> (brand)`, parallel to `variants`
    pub variant_labels: Vec<String>,
    pub selected_variant: Option<AlternateDrug>,
    pub forms: Vec<FormOption>,
    pub selected_form: Option<FormOption>,
    pub strengths: Vec<StrengthOption>,
    pub selected_strength: Option<StrengthOption>,
    pub quantities: Vec<QuantityOption>,
    /// `<quantity> <uom>`, parallel to `quantities`
    pub quantity_labels: Vec<String>,
    pub selected_quantity: Option<QuantityOption>,
}

/// Derives every dropdown from the sheet and the current selection.
///
/// Changing any level only requires calling this again with the new
/// selection; downstream levels fall back to their defaults whenever the
/// previous choice is no longer offered.
pub fn derive_options(sheet: &DrugPriceSheet, selection: &Selection) -> AvailableOptions {
    let variants = sheet.alternate_drugs.clone();
    let variant_labels = variants.iter().map(AlternateDrug::label).collect();
    let selected_variant = pick(
        &variants,
        |v| selection.variant.as_deref() == Some(v.med_name.as_str()),
        |v| v.selected,
    )
    .cloned();

    let forms = forms_for_variant(sheet, selected_variant.as_ref());
    let selected_form = pick(
        &forms,
        |f| selection.form.as_deref() == Some(f.form.as_str()),
        |f| f.selected,
    )
    .cloned();

    let Some(form) = selected_form.clone() else {
        return AvailableOptions {
            variants,
            variant_labels,
            selected_variant,
            forms,
            ..AvailableOptions::default()
        };
    };

    let strengths = strengths_for_form(sheet, &form);
    let selected_strength = pick(
        &strengths,
        |s| selection.strength.as_deref() == Some(s.strength.as_str()),
        |s| s.selected,
    )
    .cloned();

    // Quantities hang off the form; an empty strength list leaves them empty too.
    let quantities = if selected_strength.is_some() {
        quantities_for_form(sheet, &form)
    } else {
        Vec::new()
    };
    let selected_quantity = pick(
        &quantities,
        |q| {
            selection.quantity == Some(q.quantity)
                && selection.uom.as_deref().map_or(true, |uom| uom == q.uom)
        },
        |q| q.selected,
    )
    .cloned();

    let quantity_labels = quantities.iter().map(QuantityOption::label).collect();

    AvailableOptions {
        variants,
        variant_labels,
        selected_variant,
        forms,
        selected_form,
        strengths,
        selected_strength,
        quantities,
        quantity_labels,
        selected_quantity,
    }
}

/// Forms offered for a variant: a brand's whitelist when one is known,
/// otherwise every form on the sheet.
pub fn forms_for_variant(sheet: &DrugPriceSheet, variant: Option<&AlternateDrug>) -> Vec<FormOption> {
    let whitelist = variant
        .filter(|v| v.is_brand())
        .and_then(|v| brand_whitelist(&v.med_name));

    let Some(allowed) = whitelist else {
        return sheet.forms.clone();
    };

    let filtered: Vec<FormOption> = sheet
        .forms
        .iter()
        .filter(|f| allowed.contains(&f.form.as_str()))
        .cloned()
        .collect();

    if filtered.is_empty() {
        sheet.forms.clone()
    } else {
        filtered
    }
}

/// Strengths sharing the form's GSN or its leading GSN digits.
pub fn strengths_for_form(sheet: &DrugPriceSheet, form: &FormOption) -> Vec<StrengthOption> {
    let family = gsn_family(form.gsn);
    sheet
        .strengths
        .iter()
        .filter(|s| s.gsn == form.gsn || gsn_family(s.gsn) == family)
        .cloned()
        .collect()
}

/// Quantities sharing the form's GSN or measured in the form's unit.
pub fn quantities_for_form(sheet: &DrugPriceSheet, form: &FormOption) -> Vec<QuantityOption> {
    let expected = uom_for_form(&form.form);
    sheet
        .quantities
        .iter()
        .filter(|q| q.gsn == form.gsn || (!q.uom.is_empty() && q.uom == expected))
        .cloned()
        .collect()
}

/// Unit of measure quantities are expressed in for a dosage form.
pub fn uom_for_form(form: &str) -> &str {
    match form {
        "TABLET" | "TABLET ER" => "TABLET",
        "CAPSULE" => "CAPSULE",
        "LIQUID" | "ORAL SUSP" | "SOLUTION" | "ELIXIR" | "DROPS" | "DROPS SUSP" => "ML",
        "SUPP.RECT" => "SUPP.RECT",
        other => other,
    }
}

fn brand_whitelist(med_name: &str) -> Option<&'static [&'static str]> {
    BRAND_FORM_WHITELIST
        .iter()
        .find(|(brand, _)| *brand == med_name)
        .map(|(_, forms)| *forms)
}

fn gsn_family(gsn: u64) -> String {
    gsn.to_string().chars().take(GSN_FAMILY_DIGITS).collect()
}

/// Requested entry if offered, else the first flagged `selected`, else the first.
fn pick<T>(
    items: &[T],
    requested: impl Fn(&T) -> bool,
    flagged: impl Fn(&T) -> bool,
) -> Option<&T> {
    items
        .iter()
        .find(|item| requested(*item))
        .or_else(|| items.iter().find(|item| flagged(*item)))
        .or_else(|| items.first())
}
