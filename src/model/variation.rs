// src/model/variation.rs - The sellable SKU-level unit of a product

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::CustomsLogistics;
use crate::types::{ClientId, WarehouseId};

/// Option selections keyed by option name. Each entry holds the merchant
/// provided value texts for that option; for taxonomy options derived from
/// the matrix this is a single value per option.
pub type OptionSelections = BTreeMap<String, Vec<String>>;

/// Free-form attribute values keyed by attribute name.
pub type AttributeValues = BTreeMap<String, Vec<String>>;

/// Reference to an uploaded product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: Option<i64>,
    pub url: String,
    pub is_clean_image: bool,
}

/// One sellable configuration of the product.
///
/// `client_id` is assigned once when the record enters the working set and is
/// never reassigned, so edits keyed by it survive matrix reconciliation.
/// `server_id` is present only for variations the platform has persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    pub client_id: ClientId,
    pub server_id: Option<String>,
    pub sku: Option<String>,
    pub gtin: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub price: Option<Decimal>,
    pub inventory: BTreeMap<WarehouseId, u32>,
    pub options: Option<OptionSelections>,
    pub attributes: AttributeValues,
    pub image: Option<ImageRef>,
    pub customs: Option<CustomsLogistics>,
    pub quantity_value: Option<u32>,
    pub enabled: Option<bool>,
}

impl Variation {
    /// Creates a blank, unsaved variation with no selections.
    pub fn new() -> Self {
        Self {
            client_id: ClientId::new(),
            server_id: None,
            sku: None,
            gtin: None,
            color: None,
            size: None,
            price: None,
            inventory: BTreeMap::new(),
            options: None,
            attributes: AttributeValues::new(),
            image: None,
            customs: None,
            quantity_value: None,
            enabled: None,
        }
    }

    /// Creates a fresh variation for a newly generated matrix identity.
    /// SKU, price, and inventory start empty; only the option selections are
    /// populated.
    pub fn from_selections(
        color: Option<String>,
        size: Option<String>,
        options: Option<OptionSelections>,
    ) -> Self {
        Self {
            color,
            size,
            options,
            ..Self::new()
        }
    }

    /// Whether the platform has persisted this variation.
    pub fn is_saved(&self) -> bool {
        self.server_id.is_some()
    }

    /// A variation administratively disabled by the platform stays visible
    /// for reference but rejects attribute edits.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Sets the inventory count for one warehouse, clamped at zero.
    pub fn set_inventory(&mut self, warehouse_id: impl Into<WarehouseId>, count: i64) {
        self.inventory
            .insert(warehouse_id.into(), count.max(0) as u32);
    }

    pub fn inventory_for(&self, warehouse_id: &str) -> Option<u32> {
        self.inventory.get(warehouse_id).copied()
    }

    /// Total count across all warehouses, used by table rollups.
    pub fn total_inventory(&self) -> u64 {
        self.inventory.values().map(|&c| u64::from(c)).sum()
    }

    /// Customs record for this variation, creating an empty one on demand.
    pub fn customs_mut(&mut self) -> &mut CustomsLogistics {
        self.customs.get_or_insert_with(CustomsLogistics::default)
    }
}

impl Default for Variation {
    fn default() -> Self {
        Self::new()
    }
}
