// src/taxonomy.rs - Category taxonomy: variation options and attributes

//! Taxonomy data consumed from the remote catalog API. Categories define
//! which variation options (e.g. "Color", "Material") and attributes a
//! product may carry, and the legal value sets for each.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::AttributeValues;

/// Attribute name the platform reserves for size-chart images. Its values
/// are image URLs rather than taxonomy value ids.
pub const SIZE_CHART_IMG_ATTR: &str = "Size Chart Image";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyOptionValue {
    pub id: u64,
    pub value: String,
}

/// One taxonomy-defined variation option and its legal values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyOption {
    pub id: u64,
    pub name: String,
    pub values: Vec<TaxonomyOptionValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeUsage {
    AttributeUsageRequired,
    AttributeUsageRecommended,
    AttributeUsageOptional,
}

/// Input mode for an attribute, dispatched exhaustively at validation and
/// rendering time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeMode {
    FreeTextNumber,
    SingleSelect,
    MultiSelect,
    FreeTextString,
}

impl AttributeMode {
    /// Checks merchant-entered values against this mode and the attribute's
    /// predefined value set, if any.
    pub fn accepts(&self, values: &[String], allowed: &[TaxonomyOptionValue]) -> bool {
        match self {
            Self::FreeTextNumber => values
                .iter()
                .all(|v| !v.trim().is_empty() && v.trim().parse::<f64>().is_ok()),
            Self::SingleSelect => {
                values.len() <= 1
                    && values
                        .iter()
                        .all(|v| allowed.iter().any(|a| a.value == *v))
            }
            Self::MultiSelect => values
                .iter()
                .all(|v| allowed.iter().any(|a| a.value == *v)),
            Self::FreeTextString => values.iter().all(|v| !v.trim().is_empty()),
        }
    }
}

/// One taxonomy-defined attribute of the selected subcategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyAttribute {
    pub id: u64,
    pub name: String,
    pub usage: AttributeUsage,
    pub is_variation_attribute: bool,
    pub mode: AttributeMode,
    pub values: Vec<TaxonomyOptionValue>,
}

pub fn option_from_name<'a>(
    name: &str,
    options: &'a [TaxonomyOption],
) -> Option<&'a TaxonomyOption> {
    options.iter().find(|option| option.name == name)
}

pub fn option_from_id(id: u64, options: &[TaxonomyOption]) -> Option<&TaxonomyOption> {
    options.iter().find(|option| option.id == id)
}

pub fn value_from_text<'a>(
    text: &str,
    values: &'a [TaxonomyOptionValue],
) -> Option<&'a TaxonomyOptionValue> {
    values.iter().find(|value| value.value == text)
}

pub fn value_from_id(id: u64, values: &[TaxonomyOptionValue]) -> Option<&TaxonomyOptionValue> {
    values.iter().find(|value| value.id == id)
}

/// Returns true when any required attribute in scope has no merchant value.
pub fn has_missing_required(
    required: impl Iterator<Item = impl AsRef<str>>,
    values: &AttributeValues,
) -> bool {
    for name in required {
        match values.get(name.as_ref()) {
            Some(entered) if !entered.is_empty() => {}
            _ => return true,
        }
    }
    false
}

/// Remote source of taxonomy data. Lookups are fire-and-await with no retry;
/// a failure surfaces as a notification and leaves the form unchanged.
#[async_trait]
pub trait TaxonomyProvider: Send + Sync {
    async fn variation_options(&self, category_id: u64) -> Result<Vec<TaxonomyOption>>;

    async fn attributes(&self, category_id: u64) -> Result<Vec<TaxonomyAttribute>>;
}
