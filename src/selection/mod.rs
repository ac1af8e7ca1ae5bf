//! Selection Module
//!
//! Pure derivation of the drug selection dropdowns from a price sheet.

mod options;

pub use options::{
    derive_options, forms_for_variant, quantities_for_form, strengths_for_form, uom_for_form,
    AvailableOptions, Selection,
};
