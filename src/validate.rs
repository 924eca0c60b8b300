// src/validate.rs - Field and row validators for the listing form

//! Validators return the first human-readable problem they find, or `None`
//! when the input passes. The form surfaces exactly one message at a time,
//! so ordering inside each validator is part of its contract.

use rust_decimal::Decimal;

use crate::model::Variation;

/// A GTIN is 8 to 14 ASCII digits (GTIN-8 through GTIN-14), nothing else.
pub fn is_valid_gtin(text: &str) -> bool {
    (8..=14).contains(&text.len()) && text.bytes().all(|b| b.is_ascii_digit())
}

fn entered(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

/// Checks one variation's SKU against the rest of the live working list.
/// Empty SKUs never conflict; comparison is exact, case included.
pub fn unique_sku_error(variation: &Variation, all: &[Variation]) -> Option<String> {
    let sku = entered(variation.sku.as_ref())?;
    let clash = all.iter().any(|other| {
        other.client_id != variation.client_id && entered(other.sku.as_ref()) == Some(sku)
    });
    if clash {
        Some("Can't have multiple variations with the same SKU".to_string())
    } else {
        None
    }
}

/// Checks one variation's GTIN: format first, then uniqueness against the
/// rest of the working list. A blank GTIN always passes.
pub fn gtin_error(variation: &Variation, all: &[Variation]) -> Option<String> {
    let gtin = entered(variation.gtin.as_ref())?;
    if !is_valid_gtin(gtin) {
        return Some("GTIN must be 8 to 14 digits".to_string());
    }
    let clash = all.iter().any(|other| {
        other.client_id != variation.client_id && entered(other.gtin.as_ref()) == Some(gtin)
    });
    if clash {
        Some("Can't have multiple variations with the same GTIN".to_string())
    } else {
        None
    }
}

/// Whether any pair of variations in the list shares a non-empty SKU.
pub fn duplicate_sku_exists(all: &[Variation]) -> bool {
    all.iter().any(|v| unique_sku_error(v, all).is_some())
}

/// Whether any pair of variations in the list shares an identity key.
pub fn duplicate_identity_exists(all: &[Variation]) -> bool {
    use crate::matrix::VariationKey;
    let mut seen = std::collections::HashSet::new();
    all.iter().any(|v| !seen.insert(VariationKey::of(v)))
}

/// What a variation row must carry to be submittable. Derived from the form
/// configuration, not from the row itself.
#[derive(Debug, Clone, Default)]
pub struct RowRequirements {
    /// Color-varying products require a per-variation image.
    pub require_image: bool,
    /// CN-domiciled merchants must declare a customs weight.
    pub require_weight: bool,
    pub require_country_of_origin: bool,
    /// A product sold by unit price needs a quantity value on every row.
    pub has_unit_price: bool,
    /// Variation-level taxonomy attributes the category marks required.
    pub required_attributes: Vec<String>,
}

/// Walks one variation row in display order and returns the first problem.
pub fn variation_error(variation: &Variation, reqs: &RowRequirements) -> Option<String> {
    if reqs.require_image && variation.image.is_none() {
        return Some("Please provide an image for each variation".to_string());
    }
    if entered(variation.sku.as_ref()).is_none() {
        return Some("Please provide a SKU for each variation".to_string());
    }
    match variation.price {
        None => return Some("Please provide a price for each variation".to_string()),
        Some(price) if price < Decimal::ZERO => {
            return Some("Price can't be negative".to_string());
        }
        Some(_) => {}
    }
    if variation.inventory.is_empty() {
        return Some("Please provide an inventory for each variation".to_string());
    }
    if reqs.has_unit_price && variation.quantity_value.map_or(true, |q| q == 0) {
        return Some("Please provide a quantity value for each variation".to_string());
    }
    if reqs.require_weight {
        let weight = variation.customs.as_ref().and_then(|c| c.weight);
        if weight.map_or(true, |w| w <= Decimal::ZERO) {
            return Some("Please provide a weight for each variation".to_string());
        }
    }
    if reqs.require_country_of_origin {
        let country = variation
            .customs
            .as_ref()
            .and_then(|c| c.country_of_origin.as_deref());
        if country.map_or(true, str::is_empty) {
            return Some("Please provide a country of origin for each variation".to_string());
        }
    }
    for name in &reqs.required_attributes {
        match variation.attributes.get(name) {
            Some(values) if !values.is_empty() => {}
            _ => return Some(format!("Please provide a value for {name}")),
        }
    }
    None
}
