// src/model/customs.rs - Per-variation customs and logistics overrides

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Merchant-declared stock state for a variation, set from the logistics
/// bulk-apply controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryOnHand {
    NotSet,
    InStock,
    OutOfStock,
}

/// Customs and logistics declaration for one variation. All fields are
/// optional; a variation without any declared field carries no record at all
/// rather than an empty one. Dimensions are centimeters, weights are grams,
/// except `effective_weight` which the platform reports in grams after
/// converting from kilograms upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomsLogistics {
    pub country_of_origin: Option<String>,
    pub declared_name: Option<String>,
    pub declared_local_name: Option<String>,
    pub declared_value: Option<Decimal>,
    pub hs_code: Option<String>,
    pub pieces: Option<u32>,
    pub length: Option<Decimal>,
    pub width: Option<Decimal>,
    pub height: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub effective_weight: Option<Decimal>,
    pub has_powder: Option<bool>,
    pub has_liquid: Option<bool>,
    pub has_battery: Option<bool>,
    pub has_metal: Option<bool>,
    pub inventory_on_hand: Option<InventoryOnHand>,
}

impl CustomsLogistics {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges a partial update into this record. Fields set on the patch win;
    /// unset patch fields leave the current value in place.
    pub fn merge(&mut self, patch: &CustomsLogistics) {
        macro_rules! take {
            ($($field:ident),+ $(,)?) => {
                $(
                    if patch.$field.is_some() {
                        self.$field = patch.$field.clone();
                    }
                )+
            };
        }
        take!(
            country_of_origin,
            declared_name,
            declared_local_name,
            declared_value,
            hs_code,
            pieces,
            length,
            width,
            height,
            weight,
            effective_weight,
            has_powder,
            has_liquid,
            has_battery,
            has_metal,
            inventory_on_hand,
        );
    }
}
