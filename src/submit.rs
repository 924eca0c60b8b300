// src/submit.rs - Building the product upsert payload

//! Translates the form's working state into the wire shapes the catalog
//! upsert endpoint accepts. Taxonomy-backed options and attributes are
//! resolved to their ids when the selected text matches a predefined value;
//! free-text values go over the wire as text.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{
    AttributeValues, CustomsLogistics, ImageRef, MeasurementType, UnitPrice, Variation,
};
use crate::taxonomy::{
    option_from_name, value_from_text, TaxonomyAttribute, TaxonomyOption, SIZE_CHART_IMG_ATTR,
};

const LENGTH_UNIT: &str = "CENTIMETER";
const WEIGHT_UNIT: &str = "GRAM";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInput {
    pub amount: Decimal,
    pub currency_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasuredInput {
    pub value: Decimal,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryInput {
    pub warehouse_id: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub url: String,
    pub is_clean_image: bool,
}

impl From<&ImageRef> for ImageInput {
    fn from(image: &ImageRef) -> Self {
        Self {
            id: image.id,
            url: image.url.clone(),
            is_clean_image: image.is_clean_image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionValueInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub value: String,
}

/// One selected option on a variation. `id` is present when the option is
/// defined by the category taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub values: Vec<OptionValueInput>,
}

/// One attribute value set. Predefined values resolve to `value_ids`;
/// anything else, including the size-chart image attribute, goes as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityValueInput {
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gtin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<CurrencyInput>,
    pub inventory: Vec<InventoryInput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionInput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_of_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_local_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_value: Option<CurrencyInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customs_hs_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pieces: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<MeasuredInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<MeasuredInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<MeasuredInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<MeasuredInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_powder: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_liquid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_battery: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_metal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_volume: Option<QuantityValueInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_area: Option<QuantityValueInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_unit: Option<QuantityValueInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_length: Option<QuantityValueInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_weight: Option<QuantityValueInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitPriceInput {
    pub measurement_type: MeasurementType,
    pub unit: String,
    pub reference_value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpsertInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_sku: Option<String>,
    pub images: Vec<ImageInput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeInput>,
    pub variations: Vec<VariationInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<UnitPriceInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_quantity: Option<u32>,
}

/// Lookup context shared by every row of a submission.
#[derive(Debug, Clone, Copy)]
pub struct SubmitContext<'a> {
    pub currency: &'a str,
    pub taxonomy_options: &'a [TaxonomyOption],
    pub taxonomy_attributes: &'a [TaxonomyAttribute],
    pub unit_price: Option<&'a UnitPrice>,
}

pub fn currency_input(amount: Decimal, currency: &str) -> CurrencyInput {
    CurrencyInput {
        amount,
        currency_code: currency.to_string(),
    }
}

/// Resolves a variation's option selections against the category taxonomy.
/// Option and value ids are attached when the text matches; legacy free-text
/// axes never appear here, they ride the dedicated color/size fields.
pub fn option_inputs(
    selections: &crate::model::OptionSelections,
    taxonomy: &[TaxonomyOption],
) -> Vec<OptionInput> {
    selections
        .iter()
        .map(|(name, values)| {
            let option = option_from_name(name, taxonomy);
            OptionInput {
                id: option.map(|o| o.id),
                name: name.clone(),
                values: values
                    .iter()
                    .map(|text| OptionValueInput {
                        id: option.and_then(|o| value_from_text(text, &o.values).map(|v| v.id)),
                        value: text.clone(),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Resolves attribute values. Attributes with a predefined value set submit
/// ids for the values that resolve; everything else, the size-chart image
/// attribute included, submits text under the attribute name.
pub fn attribute_inputs(
    values: &AttributeValues,
    taxonomy: &[TaxonomyAttribute],
) -> Vec<AttributeInput> {
    values
        .iter()
        .filter(|(_, entered)| !entered.is_empty())
        .map(|(name, entered)| {
            let attribute = taxonomy.iter().find(|a| a.name == *name);
            if let Some(attribute) = attribute {
                if name != SIZE_CHART_IMG_ATTR && !attribute.values.is_empty() {
                    let ids: Vec<u64> = entered
                        .iter()
                        .filter_map(|text| value_from_text(text, &attribute.values).map(|v| v.id))
                        .collect();
                    if ids.len() == entered.len() {
                        return AttributeInput {
                            id: Some(attribute.id),
                            name: name.clone(),
                            value_ids: Some(ids),
                            values: None,
                        };
                    }
                }
            }
            AttributeInput {
                id: attribute.map(|a| a.id),
                name: name.clone(),
                value_ids: None,
                values: Some(entered.clone()),
            }
        })
        .collect()
}

fn quantity_slots(
    unit_price: Option<&UnitPrice>,
    value: Option<u32>,
) -> [Option<QuantityValueInput>; 5] {
    let mut slots = [None; 5];
    if let (Some(unit_price), Some(value)) = (unit_price, value) {
        let input = QuantityValueInput { value };
        let index = match unit_price.measurement {
            MeasurementType::Volume => 0,
            MeasurementType::Area => 1,
            MeasurementType::Count => 2,
            MeasurementType::Length => 3,
            MeasurementType::Weight => 4,
        };
        slots[index] = Some(input);
    }
    slots
}

fn centimeters(value: Decimal) -> MeasuredInput {
    MeasuredInput {
        value,
        unit: LENGTH_UNIT.to_string(),
    }
}

fn grams(value: Decimal) -> MeasuredInput {
    MeasuredInput {
        value,
        unit: WEIGHT_UNIT.to_string(),
    }
}

/// Builds the wire form of one variation row.
pub fn variation_input(variation: &Variation, ctx: &SubmitContext<'_>) -> VariationInput {
    let customs = variation.customs.clone().unwrap_or_default();
    let [quantity_volume, quantity_area, quantity_unit, quantity_length, quantity_weight] =
        quantity_slots(ctx.unit_price, variation.quantity_value);

    VariationInput {
        id: variation.server_id.clone(),
        sku: variation.sku.clone(),
        gtin: variation.gtin.clone(),
        color: variation.color.clone(),
        size: variation.size.clone(),
        price: variation.price.map(|amount| currency_input(amount, ctx.currency)),
        inventory: variation
            .inventory
            .iter()
            .map(|(warehouse_id, &count)| InventoryInput {
                warehouse_id: warehouse_id.clone(),
                count,
            })
            .collect(),
        options: variation
            .options
            .as_ref()
            .map(|selections| option_inputs(selections, ctx.taxonomy_options))
            .unwrap_or_default(),
        attributes: attribute_inputs(&variation.attributes, ctx.taxonomy_attributes),
        image: variation.image.as_ref().map(ImageInput::from),
        country_of_origin: customs.country_of_origin,
        declared_name: customs.declared_name,
        declared_local_name: customs.declared_local_name,
        declared_value: customs
            .declared_value
            .map(|amount| currency_input(amount, ctx.currency)),
        customs_hs_code: customs.hs_code,
        pieces: customs.pieces,
        length: customs.length.map(centimeters),
        width: customs.width.map(centimeters),
        height: customs.height.map(centimeters),
        weight: customs.weight.map(grams),
        has_powder: customs.has_powder,
        has_liquid: customs.has_liquid,
        has_battery: customs.has_battery,
        has_metal: customs.has_metal,
        quantity_volume,
        quantity_area,
        quantity_unit,
        quantity_length,
        quantity_weight,
        enabled: variation.enabled,
    }
}

/// Folds the form-level default customs declaration into a single-variation
/// product, which has no per-row logistics editor of its own.
pub fn fold_default_customs(variation: &mut Variation, defaults: &CustomsLogistics) {
    if defaults.is_empty() {
        return;
    }
    let mut merged = defaults.clone();
    if let Some(own) = &variation.customs {
        merged.merge(own);
    }
    variation.customs = Some(merged);
}
