// src/state/mod.rs - The add/edit product form state container

//! Owned state for one open add/edit product form. All mutation goes through
//! methods here so the working variation list, the option-dimension slots,
//! and the discard bookkeeping can never drift apart.

mod store;

pub use store::FormStore;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::matrix::{
    cross_product, duplicate_tokens, parse_tokens, reconcile, DimensionKind, OptionDimension,
    VariationKey, MAX_OPTION_SLOTS,
};
use crate::model::{
    AttributeValues, CustomsLogistics, ImageRef, UnitPrice, Variation,
};
use crate::notify::Notification;
use crate::submit::{
    attribute_inputs, fold_default_customs, variation_input, ImageInput, ProductUpsertInput,
    SubmitContext, UnitPriceInput,
};
use crate::taxonomy::{
    has_missing_required, option_from_name, AttributeUsage, TaxonomyAttribute, TaxonomyOption,
    TaxonomyProvider,
};
use crate::types::{ClientId, CurrencyCode, WarehouseId};
use crate::validate::{
    duplicate_identity_exists, duplicate_sku_exists, gtin_error, unique_sku_error,
    variation_error, RowRequirements,
};

/// One of the form's option-dimension selectors with its current value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSlot {
    pub kind: DimensionKind,
    pub values: Vec<String>,
}

/// What applying the matrix did, or would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied {
        retained: Vec<ClientId>,
        created: Vec<ClientId>,
        stale: Vec<ClientId>,
    },
    /// The requested matrix has no cells; every current variation would be
    /// discarded. Nothing was changed yet, the merchant must confirm.
    WouldClear,
}

#[derive(Debug, Clone)]
pub struct ProductFormState {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub subcategory_id: Option<u64>,
    pub tags: Vec<String>,
    pub parent_sku: Option<String>,
    pub primary_currency: CurrencyCode,
    pub standard_warehouse_id: WarehouseId,
    pub is_cn_merchant: bool,
    pub images: Vec<ImageRef>,

    pub has_variations: bool,
    pub colors_text: String,
    pub sizes_text: String,
    slots: [Option<OptionSlot>; MAX_OPTION_SLOTS],

    variations: Vec<Variation>,
    discard_candidates: Vec<ClientId>,
    pending_clear: bool,

    pub taxonomy_options: Vec<TaxonomyOption>,
    pub taxonomy_attributes: Vec<TaxonomyAttribute>,
    pub product_attributes: AttributeValues,

    pub default_customs: CustomsLogistics,
    pub unit_price: Option<UnitPrice>,
    pub max_quantity: Option<u32>,

    pub notifications: Vec<Notification>,
}

impl ProductFormState {
    /// A blank form for a new product, priced in `currency` and stocked from
    /// the merchant's standard warehouse.
    pub fn new(currency: impl Into<CurrencyCode>, standard_warehouse_id: impl Into<WarehouseId>) -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            subcategory_id: None,
            tags: Vec::new(),
            parent_sku: None,
            primary_currency: currency.into(),
            standard_warehouse_id: standard_warehouse_id.into(),
            is_cn_merchant: false,
            images: Vec::new(),
            has_variations: false,
            colors_text: String::new(),
            sizes_text: String::new(),
            slots: [None, None],
            variations: Vec::new(),
            discard_candidates: Vec::new(),
            pending_clear: false,
            taxonomy_options: Vec::new(),
            taxonomy_attributes: Vec::new(),
            product_attributes: AttributeValues::new(),
            default_customs: CustomsLogistics::default(),
            unit_price: None,
            max_quantity: None,
            notifications: Vec::new(),
        }
    }

    /// Opens the form over variations already persisted by the platform.
    pub fn for_existing(
        id: impl Into<String>,
        currency: impl Into<CurrencyCode>,
        standard_warehouse_id: impl Into<WarehouseId>,
        variations: Vec<Variation>,
    ) -> Self {
        let mut state = Self::new(currency, standard_warehouse_id);
        state.id = Some(id.into());
        state.has_variations = variations.len() > 1
            || variations
                .iter()
                .any(|v| !VariationKey::of(v).is_empty());
        state.variations = variations;
        state
    }

    // ---- option slots -----------------------------------------------------

    /// Assigns (or clears, with `None`) the dimension shown in one selector.
    /// Changing a slot's dimension resets its value list.
    pub fn select_option(&mut self, slot: usize, kind: Option<DimensionKind>) -> Result<()> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or_else(|| Error::dimension(slot, "No such option slot"))?;
        *entry = kind.map(|kind| OptionSlot {
            kind,
            values: Vec::new(),
        });
        Ok(())
    }

    /// Replaces the selected values for one slot.
    pub fn set_option_values(&mut self, slot: usize, values: Vec<String>) -> Result<()> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or_else(|| Error::dimension(slot, "No such option slot"))?
            .as_mut()
            .ok_or_else(|| Error::dimension(slot, "No dimension selected for this slot"))?;
        entry.values = values;
        Ok(())
    }

    pub fn slot(&self, slot: usize) -> Option<&OptionSlot> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// First problem with the current slot configuration, if any.
    pub fn options_error(&self) -> Option<String> {
        let active: Vec<&OptionSlot> = self.slots.iter().flatten().collect();
        for (i, slot) in active.iter().enumerate() {
            if active[..i]
                .iter()
                .any(|other| other.kind.key_name() == slot.kind.key_name())
            {
                return Some(format!("{} is selected more than once", slot.kind));
            }
        }
        None
    }

    // ---- applying the matrix ----------------------------------------------

    /// Applies the legacy free-text color/size matrix. Duplicate tokens in
    /// either field are an input error and nothing changes.
    pub fn apply_free_text_matrix(&mut self) -> Result<ApplyOutcome> {
        for (label, raw) in [("color", &self.colors_text), ("size", &self.sizes_text)] {
            let duplicates = duplicate_tokens(raw);
            if !duplicates.is_empty() {
                return Err(Error::tokens(
                    raw.clone(),
                    format!("Duplicate {label} values: {}", duplicates.join(", ")),
                ));
            }
        }

        let mut dimensions = Vec::new();
        let colors = parse_tokens(&self.colors_text);
        if !colors.is_empty() {
            dimensions.push(OptionDimension::new(DimensionKind::LegacyColor, colors));
        }
        let sizes = parse_tokens(&self.sizes_text);
        if !sizes.is_empty() {
            dimensions.push(OptionDimension::new(DimensionKind::LegacySize, sizes));
        }
        Ok(self.apply_dimensions(&dimensions))
    }

    /// Applies the matrix built from the option-dimension slots. A slot with
    /// a dimension selected but no values yet does not participate, matching
    /// the free-text path where a blank field is simply absent.
    pub fn apply_option_matrix(&mut self) -> Result<ApplyOutcome> {
        if let Some(problem) = self.options_error() {
            return Err(Error::validation("options", problem));
        }
        let dimensions: Vec<OptionDimension> = self
            .slots
            .iter()
            .flatten()
            .filter(|slot| !slot.values.is_empty())
            .map(|slot| OptionDimension::new(slot.kind.clone(), slot.values.clone()))
            .collect();
        Ok(self.apply_dimensions(&dimensions))
    }

    fn apply_dimensions(&mut self, dimensions: &[OptionDimension]) -> ApplyOutcome {
        let cells = cross_product(dimensions);
        if cells.is_empty() {
            if self.variations.is_empty() {
                return ApplyOutcome::Applied {
                    retained: Vec::new(),
                    created: Vec::new(),
                    stale: Vec::new(),
                };
            }
            // Leave the rows alone until the merchant confirms the wipe.
            self.pending_clear = true;
            self.discard_candidates = self.variations.iter().map(|v| v.client_id).collect();
            return ApplyOutcome::WouldClear;
        }

        let result = reconcile(&cells, &self.variations);
        self.variations = result.working;
        self.discard_candidates = result.stale.clone();
        self.pending_clear = false;
        debug!(
            rows = self.variations.len(),
            pending_discard = self.discard_candidates.len(),
            "Applied variation matrix"
        );
        ApplyOutcome::Applied {
            retained: result.retained,
            created: result.created,
            stale: result.stale,
        }
    }

    /// Variations currently flagged for discard.
    pub fn discard_candidates(&self) -> &[ClientId] {
        &self.discard_candidates
    }

    /// Flags an arbitrary set of rows for discard, e.g. from row checkboxes.
    pub fn request_discard(&mut self, ids: impl IntoIterator<Item = ClientId>) {
        for id in ids {
            if self.variations.iter().any(|v| v.client_id == id)
                && !self.discard_candidates.contains(&id)
            {
                self.discard_candidates.push(id);
            }
        }
    }

    /// Removes every flagged row. Completing a full clear also turns the
    /// variation matrix off.
    pub fn confirm_discard(&mut self) {
        self.variations
            .retain(|v| !self.discard_candidates.contains(&v.client_id));
        self.discard_candidates.clear();
        if self.pending_clear {
            self.pending_clear = false;
            self.has_variations = false;
        }
    }

    /// Keeps every flagged row and drops the flags.
    pub fn cancel_discard(&mut self) {
        self.discard_candidates.clear();
        self.pending_clear = false;
    }

    // ---- variation edits --------------------------------------------------

    fn variation_mut(&mut self, id: ClientId) -> Result<&mut Variation> {
        self.variations
            .iter_mut()
            .find(|v| v.client_id == id)
            .ok_or_else(|| Error::state("update_variation", format!("No variation {id}")))
    }

    /// Applies an arbitrary edit to one row.
    pub fn update_variation(
        &mut self,
        id: ClientId,
        edit: impl FnOnce(&mut Variation),
    ) -> Result<()> {
        edit(self.variation_mut(id)?);
        Ok(())
    }

    /// Sets one attribute on one row. Disabled rows are read-only.
    pub fn set_variation_attribute(
        &mut self,
        id: ClientId,
        name: impl Into<String>,
        values: Vec<String>,
    ) -> Result<()> {
        let variation = self.variation_mut(id)?;
        if !variation.is_enabled() {
            return Err(Error::state(
                "set_variation_attribute",
                "Variation is disabled and can't be edited",
            ));
        }
        let name = name.into();
        if values.is_empty() {
            variation.attributes.remove(&name);
        } else {
            variation.attributes.insert(name, values);
        }
        Ok(())
    }

    pub fn set_variation_inventory(
        &mut self,
        id: ClientId,
        warehouse_id: impl Into<WarehouseId>,
        count: i64,
    ) -> Result<()> {
        self.variation_mut(id)?.set_inventory(warehouse_id, count);
        Ok(())
    }

    /// Merges a customs patch into one row.
    pub fn update_variation_customs(
        &mut self,
        id: ClientId,
        patch: &CustomsLogistics,
    ) -> Result<()> {
        self.variation_mut(id)?.customs_mut().merge(patch);
        Ok(())
    }

    /// Merges a customs patch into every row, the bulk-apply control.
    pub fn apply_customs_to_all(&mut self, patch: &CustomsLogistics) {
        for variation in &mut self.variations {
            variation.customs_mut().merge(patch);
        }
    }

    pub fn update_default_customs(&mut self, patch: &CustomsLogistics) {
        self.default_customs.merge(patch);
    }

    // ---- single-variation mode --------------------------------------------

    pub fn check_has_variations(&mut self) {
        self.has_variations = true;
    }

    /// Turns the matrix off, collapsing the working set to a single
    /// selection-free variation. The first row's SKU, pricing, and inventory
    /// carry over; the rest are dropped outright.
    pub fn uncheck_has_variations(&mut self) {
        self.has_variations = false;
        self.colors_text.clear();
        self.sizes_text.clear();
        self.slots = [None, None];
        self.discard_candidates.clear();
        self.pending_clear = false;

        let mut single = self.variations.drain(..).next().unwrap_or_default();
        single.color = None;
        single.size = None;
        single.options = None;
        self.variations = vec![single];
    }

    /// The one row of a no-variations product, created on first touch.
    pub fn single_variation_mut(&mut self) -> &mut Variation {
        if self.variations.is_empty() {
            self.variations.push(Variation::new());
        }
        &mut self.variations[0]
    }

    pub fn set_single_sku(&mut self, sku: impl Into<String>) {
        self.single_variation_mut().sku = Some(sku.into());
    }

    pub fn set_single_gtin(&mut self, gtin: impl Into<String>) {
        self.single_variation_mut().gtin = Some(gtin.into());
    }

    pub fn set_single_price(&mut self, price: rust_decimal::Decimal) {
        self.single_variation_mut().price = Some(price);
    }

    pub fn set_single_inventory(&mut self, count: i64) {
        let warehouse = self.standard_warehouse_id.clone();
        self.single_variation_mut().set_inventory(warehouse, count);
    }

    pub fn set_single_quantity_value(&mut self, value: u32) {
        self.single_variation_mut().quantity_value = Some(value);
    }

    pub fn set_images(&mut self, images: Vec<ImageRef>) {
        self.images = images;
    }

    // ---- taxonomy ---------------------------------------------------------

    /// Reloads variation options and attributes for the selected category.
    /// On lookup failure the form is left unchanged and a notification is
    /// queued instead.
    pub async fn refresh_taxonomy(&mut self, provider: &dyn TaxonomyProvider) {
        let Some(category_id) = self.subcategory_id else {
            self.taxonomy_options.clear();
            self.taxonomy_attributes.clear();
            self.prune_invalid_selections();
            return;
        };

        let options = provider.variation_options(category_id).await;
        let attributes = provider.attributes(category_id).await;
        match (options, attributes) {
            (Ok(options), Ok(attributes)) => {
                self.taxonomy_options = options;
                self.taxonomy_attributes = attributes;
                self.prune_invalid_selections();
            }
            (Err(error), _) | (_, Err(error)) => {
                warn!(%error, category_id, "Taxonomy lookup failed");
                self.notifications.push(Notification::negative(
                    "Something went wrong loading category data. Please try again.",
                ));
            }
        }
    }

    /// Drops slot selections the current taxonomy no longer defines. Legacy
    /// free-text slots are never pruned.
    fn prune_invalid_selections(&mut self) {
        for entry in self.slots.iter_mut() {
            let Some(slot) = entry else { continue };
            let DimensionKind::Taxonomy(name) = &slot.kind else {
                continue;
            };
            match option_from_name(name, &self.taxonomy_options) {
                Some(option) => {
                    slot.values
                        .retain(|value| option.values.iter().any(|v| v.value == *value));
                }
                None => *entry = None,
            }
        }
    }

    // ---- validation -------------------------------------------------------

    pub fn sku_error(&self, id: ClientId) -> Option<String> {
        let variation = self.variations.iter().find(|v| v.client_id == id)?;
        unique_sku_error(variation, &self.variations)
    }

    pub fn gtin_error(&self, id: ClientId) -> Option<String> {
        let variation = self.variations.iter().find(|v| v.client_id == id)?;
        gtin_error(variation, &self.variations)
    }

    fn row_requirements(&self) -> RowRequirements {
        RowRequirements {
            require_image: self.has_variations
                && self.variations.iter().any(|v| v.color.is_some()),
            require_weight: self.is_cn_merchant,
            require_country_of_origin: self.is_cn_merchant,
            has_unit_price: self.unit_price.is_some(),
            required_attributes: self
                .taxonomy_attributes
                .iter()
                .filter(|a| {
                    a.is_variation_attribute && a.usage == AttributeUsage::AttributeUsageRequired
                })
                .map(|a| a.name.clone())
                .collect(),
        }
    }

    /// Walks the whole form in display order and returns the first problem
    /// blocking submission, or `None` when the form may be submitted.
    pub fn error_message(&self) -> Option<String> {
        if self.subcategory_id.is_none() {
            return Some("Please select a category".to_string());
        }
        if self.name.trim().is_empty() {
            return Some("Please enter a product name".to_string());
        }
        if self.description.trim().is_empty() {
            return Some("Please enter a product description".to_string());
        }
        if self.images.is_empty() {
            return Some("Please add at least one product image".to_string());
        }

        let required_product_attributes = self
            .taxonomy_attributes
            .iter()
            .filter(|a| {
                !a.is_variation_attribute && a.usage == AttributeUsage::AttributeUsageRequired
            })
            .map(|a| a.name.as_str());
        if has_missing_required(required_product_attributes, &self.product_attributes) {
            return Some("Please provide a value for all required attributes".to_string());
        }

        if self.variations.is_empty() {
            return Some("Please add at least one variation".to_string());
        }
        let requirements = self.row_requirements();
        for variation in self.ordered() {
            if let Some(problem) = variation_error(variation, &requirements) {
                return Some(problem);
            }
        }

        if duplicate_sku_exists(&self.variations) {
            return Some("Can't have multiple variations with the same SKU".to_string());
        }
        if duplicate_identity_exists(&self.variations) {
            return Some("Can't have multiple variations with the same options".to_string());
        }
        for variation in &self.variations {
            if let Some(problem) = gtin_error(variation, &self.variations) {
                return Some(problem);
            }
        }

        if let Some(unit_price) = &self.unit_price {
            if !unit_price.is_valid() {
                return Some("Please provide a valid unit price reference value".to_string());
            }
        }
        None
    }

    // ---- views ------------------------------------------------------------

    /// Rows in display order: unsaved rows first, then persisted rows, each
    /// group in working-list order.
    pub fn ordered(&self) -> impl Iterator<Item = &Variation> {
        self.variations
            .iter()
            .filter(|v| !v.is_saved())
            .chain(self.variations.iter().filter(|v| v.is_saved()))
    }

    pub fn variations(&self) -> &[Variation] {
        &self.variations
    }

    /// Distinct legacy colors across the working set, first-seen order.
    pub fn variation_colors(&self) -> Vec<&str> {
        let mut colors = Vec::new();
        for variation in &self.variations {
            if let Some(color) = variation.color.as_deref() {
                if !colors.contains(&color) {
                    colors.push(color);
                }
            }
        }
        colors
    }

    /// Distinct legacy sizes across the working set, first-seen order.
    pub fn variation_sizes(&self) -> Vec<&str> {
        let mut sizes = Vec::new();
        for variation in &self.variations {
            if let Some(size) = variation.size.as_deref() {
                if !sizes.contains(&size) {
                    sizes.push(size);
                }
            }
        }
        sizes
    }

    /// Option names present anywhere in the working set.
    pub fn option_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for variation in &self.variations {
            if let Some(options) = &variation.options {
                for name in options.keys() {
                    if !names.contains(&name.as_str()) {
                        names.push(name.as_str());
                    }
                }
            }
        }
        names
    }

    // ---- submission -------------------------------------------------------

    /// Builds the upsert payload from the current state. Rows flagged for
    /// discard are excluded; a single-variation product absorbs the
    /// form-level customs defaults.
    pub fn upsert_input(&self) -> ProductUpsertInput {
        let ctx = SubmitContext {
            currency: &self.primary_currency,
            taxonomy_options: &self.taxonomy_options,
            taxonomy_attributes: &self.taxonomy_attributes,
            unit_price: self.unit_price.as_ref(),
        };

        let variations = self
            .ordered()
            .filter(|v| !self.discard_candidates.contains(&v.client_id))
            .map(|variation| {
                if self.has_variations {
                    variation_input(variation, &ctx)
                } else {
                    let mut folded = variation.clone();
                    fold_default_customs(&mut folded, &self.default_customs);
                    variation_input(&folded, &ctx)
                }
            })
            .collect();

        ProductUpsertInput {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            subcategory_id: self.subcategory_id,
            tags: self.tags.clone(),
            parent_sku: self.parent_sku.clone(),
            images: self.images.iter().map(ImageInput::from).collect(),
            attributes: attribute_inputs(&self.product_attributes, &self.taxonomy_attributes),
            variations,
            unit_price: self.unit_price.as_ref().map(|u| UnitPriceInput {
                measurement_type: u.measurement,
                unit: u.unit.clone(),
                reference_value: u.reference_value,
            }),
            max_quantity: self.max_quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn form() -> ProductFormState {
        ProductFormState::new("USD", "standard")
    }

    fn apply_colors_sizes(state: &mut ProductFormState, colors: &str, sizes: &str) -> ApplyOutcome {
        state.colors_text = colors.to_string();
        state.sizes_text = sizes.to_string();
        state.apply_free_text_matrix().unwrap()
    }

    #[test]
    fn test_free_text_matrix_generates_rows() {
        let mut state = form();
        state.check_has_variations();
        let outcome = apply_colors_sizes(&mut state, "Red, Blue", "S, M");

        match outcome {
            ApplyOutcome::Applied {
                retained,
                created,
                stale,
            } => {
                assert!(retained.is_empty());
                assert_eq!(created.len(), 4);
                assert!(stale.is_empty());
            }
            ApplyOutcome::WouldClear => panic!("expected rows"),
        }
        assert_eq!(state.variations().len(), 4);
        assert_eq!(state.variation_colors(), vec!["Red", "Blue"]);
        assert_eq!(state.variation_sizes(), vec!["S", "M"]);
    }

    #[test]
    fn test_duplicate_tokens_are_rejected() {
        let mut state = form();
        state.colors_text = "Red, red".to_string();
        let error = state.apply_free_text_matrix().unwrap_err();
        assert!(error.is_field_level());
        assert!(state.variations().is_empty());
    }

    #[test]
    fn test_growing_the_matrix_keeps_edits() {
        let mut state = form();
        state.check_has_variations();
        apply_colors_sizes(&mut state, "Red, Blue", "S, M");

        let red_s = state.variations()[0].client_id;
        state
            .update_variation(red_s, |v| v.sku = Some("RED-S".to_string()))
            .unwrap();

        apply_colors_sizes(&mut state, "Red, Blue", "S, M, L");
        assert_eq!(state.variations().len(), 6);
        let kept = state
            .variations()
            .iter()
            .find(|v| v.client_id == red_s)
            .unwrap();
        assert_eq!(kept.sku.as_deref(), Some("RED-S"));
    }

    #[test]
    fn test_shrinking_flags_discard_candidates() {
        let mut state = form();
        state.check_has_variations();
        apply_colors_sizes(&mut state, "Red, Blue", "S, M");

        apply_colors_sizes(&mut state, "Red", "S, M");
        // Blue rows are flagged but still present until confirmed.
        assert_eq!(state.variations().len(), 4);
        assert_eq!(state.discard_candidates().len(), 2);

        state.confirm_discard();
        assert_eq!(state.variations().len(), 2);
        assert!(state.discard_candidates().is_empty());
        assert!(state
            .variations()
            .iter()
            .all(|v| v.color.as_deref() == Some("Red")));
    }

    #[test]
    fn test_cancel_discard_keeps_rows() {
        let mut state = form();
        state.check_has_variations();
        apply_colors_sizes(&mut state, "Red, Blue", "");
        apply_colors_sizes(&mut state, "Red", "");
        assert_eq!(state.discard_candidates().len(), 1);

        state.cancel_discard();
        assert_eq!(state.variations().len(), 2);
        assert!(state.discard_candidates().is_empty());
    }

    #[test]
    fn test_clearing_all_values_requires_confirmation() {
        let mut state = form();
        state.check_has_variations();
        apply_colors_sizes(&mut state, "Red", "S");

        let outcome = apply_colors_sizes(&mut state, "", "");
        assert_eq!(outcome, ApplyOutcome::WouldClear);
        assert_eq!(state.variations().len(), 1);

        state.confirm_discard();
        assert!(state.variations().is_empty());
        assert!(!state.has_variations);
    }

    #[test]
    fn test_option_matrix_with_taxonomy_dimension() {
        let mut state = form();
        state.check_has_variations();
        state
            .select_option(0, Some(DimensionKind::Taxonomy("Material".to_string())))
            .unwrap();
        state
            .set_option_values(0, vec!["Wool".to_string(), "Cotton".to_string()])
            .unwrap();
        state.select_option(1, Some(DimensionKind::LegacySize)).unwrap();
        state.set_option_values(1, vec!["S".to_string()]).unwrap();

        match state.apply_option_matrix().unwrap() {
            ApplyOutcome::Applied { created, .. } => assert_eq!(created.len(), 2),
            ApplyOutcome::WouldClear => panic!("expected rows"),
        }
        assert_eq!(state.option_names(), vec!["Material"]);
    }

    #[test]
    fn test_valueless_slot_does_not_wipe_the_matrix() {
        let mut state = form();
        state.check_has_variations();
        state
            .select_option(0, Some(DimensionKind::Taxonomy("Material".to_string())))
            .unwrap();
        state
            .set_option_values(0, vec!["Wool".to_string(), "Cotton".to_string()])
            .unwrap();
        state.apply_option_matrix().unwrap();
        assert_eq!(state.variations().len(), 2);

        // A second dimension selected but not yet populated sits out the
        // apply instead of clearing everything.
        state
            .select_option(1, Some(DimensionKind::Taxonomy("Pattern".to_string())))
            .unwrap();
        match state.apply_option_matrix().unwrap() {
            ApplyOutcome::Applied {
                retained,
                created,
                stale,
            } => {
                assert_eq!(retained.len(), 2);
                assert!(created.is_empty());
                assert!(stale.is_empty());
            }
            ApplyOutcome::WouldClear => panic!("expected rows to survive"),
        }
        assert_eq!(state.variations().len(), 2);
        assert!(state.discard_candidates().is_empty());

        // With no populated slot at all, the apply is a clear-all and still
        // waits for confirmation.
        state.set_option_values(0, Vec::new()).unwrap();
        assert_eq!(state.apply_option_matrix().unwrap(), ApplyOutcome::WouldClear);
        assert_eq!(state.variations().len(), 2);
        assert_eq!(state.discard_candidates().len(), 2);
    }

    #[test]
    fn test_duplicate_slot_selection_is_rejected() {
        let mut state = form();
        state.select_option(0, Some(DimensionKind::LegacyColor)).unwrap();
        state.select_option(1, Some(DimensionKind::LegacyColor)).unwrap();
        assert!(state.options_error().is_some());
        assert!(state.apply_option_matrix().is_err());

        assert!(state.select_option(MAX_OPTION_SLOTS, None).is_err());
    }

    #[test]
    fn test_disabled_variation_rejects_attribute_edits() {
        let mut state = form();
        state.check_has_variations();
        apply_colors_sizes(&mut state, "Red", "");
        let id = state.variations()[0].client_id;

        state
            .update_variation(id, |v| v.enabled = Some(false))
            .unwrap();
        let error = state
            .set_variation_attribute(id, "Fabric", vec!["Cotton".to_string()])
            .unwrap_err();
        assert!(!error.is_field_level());
    }

    #[test]
    fn test_uncheck_collapses_to_single_variation() {
        let mut state = form();
        state.check_has_variations();
        apply_colors_sizes(&mut state, "Red, Blue", "S");
        state
            .update_variation(state.variations()[0].client_id, |v| {
                v.sku = Some("KEEP".to_string());
            })
            .unwrap();

        state.uncheck_has_variations();
        assert_eq!(state.variations().len(), 1);
        let single = &state.variations()[0];
        assert_eq!(single.sku.as_deref(), Some("KEEP"));
        assert!(single.color.is_none());
        assert!(single.size.is_none());
    }

    #[test]
    fn test_customs_bulk_apply() {
        let mut state = form();
        state.check_has_variations();
        apply_colors_sizes(&mut state, "Red, Blue", "");

        state.apply_customs_to_all(&CustomsLogistics {
            weight: Some(Decimal::new(250, 0)),
            ..Default::default()
        });
        assert!(state
            .variations()
            .iter()
            .all(|v| v.customs.as_ref().and_then(|c| c.weight) == Some(Decimal::new(250, 0))));
    }

    #[test]
    fn test_error_message_walk_order() {
        let mut state = form();
        assert_eq!(state.error_message().as_deref(), Some("Please select a category"));

        state.subcategory_id = Some(100);
        assert_eq!(state.error_message().as_deref(), Some("Please enter a product name"));

        state.name = "Wool Sweater".to_string();
        assert_eq!(
            state.error_message().as_deref(),
            Some("Please enter a product description")
        );

        state.description = "A warm sweater.".to_string();
        assert_eq!(
            state.error_message().as_deref(),
            Some("Please add at least one product image")
        );

        state.set_images(vec![ImageRef {
            id: Some(1),
            url: "https://img.example/1.jpg".to_string(),
            is_clean_image: false,
        }]);
        assert_eq!(
            state.error_message().as_deref(),
            Some("Please add at least one variation")
        );

        state.set_single_sku("SKU-1");
        state.set_single_price(Decimal::new(1999, 2));
        state.set_single_inventory(10);
        assert!(state.error_message().is_none());
    }

    #[test]
    fn test_duplicate_sku_blocks_submission() {
        let mut state = form();
        state.subcategory_id = Some(100);
        state.name = "Sweater".to_string();
        state.description = "Warm.".to_string();
        state.set_images(vec![ImageRef {
            id: None,
            url: "https://img.example/1.jpg".to_string(),
            is_clean_image: false,
        }]);
        state.check_has_variations();
        state.colors_text = "Red, Blue".to_string();
        state.apply_free_text_matrix().unwrap();

        for id in state
            .variations()
            .iter()
            .map(|v| v.client_id)
            .collect::<Vec<_>>()
        {
            state
                .update_variation(id, |v| {
                    v.sku = Some("SAME".to_string());
                    v.price = Some(Decimal::ONE);
                    v.set_inventory("standard", 1);
                    v.image = Some(ImageRef {
                        id: None,
                        url: "https://img.example/v.jpg".to_string(),
                        is_clean_image: false,
                    });
                })
                .unwrap();
        }
        assert_eq!(
            state.error_message().as_deref(),
            Some("Can't have multiple variations with the same SKU")
        );
        let first = state.variations()[0].client_id;
        assert!(state.sku_error(first).is_some());
    }

    #[test]
    fn test_ordered_puts_unsaved_first() {
        let mut state = form();
        let mut saved = Variation::from_selections(Some("Red".into()), None, None);
        saved.server_id = Some("srv-1".to_string());
        let fresh = Variation::from_selections(Some("Blue".into()), None, None);
        state.variations = vec![saved, fresh];

        let order: Vec<Option<&str>> = state.ordered().map(|v| v.color.as_deref()).collect();
        assert_eq!(order, vec![Some("Blue"), Some("Red")]);
    }

    #[test]
    fn test_upsert_excludes_discard_candidates() {
        let mut state = form();
        state.name = "Sweater".to_string();
        state.description = "Warm.".to_string();
        state.check_has_variations();
        apply_colors_sizes(&mut state, "Red, Blue", "");
        apply_colors_sizes(&mut state, "Red", "");

        let input = state.upsert_input();
        assert_eq!(input.variations.len(), 1);
        assert_eq!(input.variations[0].color.as_deref(), Some("Red"));
    }

    #[tokio::test]
    async fn test_taxonomy_failure_leaves_state_unchanged() {
        struct FailingProvider;

        #[async_trait::async_trait]
        impl TaxonomyProvider for FailingProvider {
            async fn variation_options(
                &self,
                _category_id: u64,
            ) -> crate::error::Result<Vec<TaxonomyOption>> {
                Err(Error::lookup("taxonomy.variationOptions", "request failed"))
            }

            async fn attributes(
                &self,
                _category_id: u64,
            ) -> crate::error::Result<Vec<TaxonomyAttribute>> {
                Err(Error::lookup("taxonomy.attributes", "request failed"))
            }
        }

        let mut state = form();
        state.subcategory_id = Some(100);
        state.taxonomy_options = vec![TaxonomyOption {
            id: 1,
            name: "Material".to_string(),
            values: Vec::new(),
        }];

        state.refresh_taxonomy(&FailingProvider).await;
        assert_eq!(state.taxonomy_options.len(), 1);
        assert_eq!(state.notifications.len(), 1);
    }

    #[tokio::test]
    async fn test_taxonomy_refresh_prunes_stale_selections() {
        struct FixedProvider;

        #[async_trait::async_trait]
        impl TaxonomyProvider for FixedProvider {
            async fn variation_options(
                &self,
                _category_id: u64,
            ) -> crate::error::Result<Vec<TaxonomyOption>> {
                Ok(vec![TaxonomyOption {
                    id: 1,
                    name: "Material".to_string(),
                    values: vec![crate::taxonomy::TaxonomyOptionValue {
                        id: 10,
                        value: "Wool".to_string(),
                    }],
                }])
            }

            async fn attributes(
                &self,
                _category_id: u64,
            ) -> crate::error::Result<Vec<TaxonomyAttribute>> {
                Ok(Vec::new())
            }
        }

        let mut state = form();
        state.subcategory_id = Some(100);
        state
            .select_option(0, Some(DimensionKind::Taxonomy("Material".to_string())))
            .unwrap();
        state
            .set_option_values(0, vec!["Wool".to_string(), "Linen".to_string()])
            .unwrap();
        state
            .select_option(1, Some(DimensionKind::Taxonomy("Pattern".to_string())))
            .unwrap();

        state.refresh_taxonomy(&FixedProvider).await;
        assert_eq!(state.slot(0).unwrap().values, vec!["Wool".to_string()]);
        assert!(state.slot(1).is_none());
    }
}
