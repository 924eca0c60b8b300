// src/matrix/permute.rs - Cross-product generation over option dimensions

use crate::matrix::{DimensionKind, OptionDimension, VariationKey};
use crate::model::{OptionSelections, Variation};

/// One cell of the variation matrix: a concrete choice of value for every
/// active dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Combination {
    pub color: Option<String>,
    pub size: Option<String>,
    pub options: OptionSelections,
}

impl Combination {
    fn assign(mut self, kind: &DimensionKind, value: &str) -> Self {
        match kind {
            // Whitespace-only legacy values behave as if the field was
            // never set.
            DimensionKind::LegacyColor => {
                self.color = non_blank(value);
            }
            DimensionKind::LegacySize => {
                self.size = non_blank(value);
            }
            DimensionKind::Taxonomy(name) => {
                self.options.insert(name.clone(), vec![value.to_string()]);
            }
        }
        self
    }

    pub fn identity(&self) -> VariationKey {
        let mut key = VariationKey::new();
        if let Some(color) = &self.color {
            key.insert(crate::matrix::LEGACY_COLOR_KEY, vec![color.clone()]);
        }
        if let Some(size) = &self.size {
            key.insert(crate::matrix::LEGACY_SIZE_KEY, vec![size.clone()]);
        }
        for (name, values) in &self.options {
            key.insert(name.clone(), values.clone());
        }
        key
    }

    /// Synthesizes a fresh variation for this cell: selections populated,
    /// everything else empty.
    pub fn into_variation(self) -> Variation {
        let options = if self.options.is_empty() {
            None
        } else {
            Some(self.options)
        };
        Variation::from_selections(self.color, self.size, options)
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Generates the full combinatorial set of matrix cells, outer loop over the
/// first dimension's values in list order, inner loop over the second.
///
/// No active dimensions, or any active dimension with an empty value list,
/// yields no cells; callers treat an empty result as "would clear the
/// matrix" and must not synthesize empty-value variations from it.
pub fn cross_product(dimensions: &[OptionDimension]) -> Vec<Combination> {
    if dimensions.is_empty() || dimensions.iter().any(|d| d.values.is_empty()) {
        return Vec::new();
    }

    let mut combinations = vec![Combination::default()];
    for dimension in dimensions {
        combinations = combinations
            .into_iter()
            .flat_map(|combination| {
                dimension
                    .values
                    .iter()
                    .map(move |value| combination.clone().assign(&dimension.kind, value))
            })
            .collect();
    }
    combinations
}
