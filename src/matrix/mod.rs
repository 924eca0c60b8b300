// src/matrix/mod.rs

//! The variation matrix: parsing merchant-entered option values, generating
//! the cross-product of active option dimensions, and reconciling the result
//! against the variations already in the working set.

mod identity;
mod permute;
mod reconcile;
mod tokens;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use identity::{VariationKey, LEGACY_COLOR_KEY, LEGACY_SIZE_KEY};
pub use permute::{cross_product, Combination};
pub use reconcile::{reconcile, Reconciliation};
pub use tokens::{duplicate_tokens, parse_tokens};

/// The form exposes exactly this many option-dimension selectors. A product
/// varies along at most two axes at once.
pub const MAX_OPTION_SLOTS: usize = 2;

/// One axis of variation. Legacy color/size are the pre-taxonomy free-text
/// axes; taxonomy dimensions are named options defined by the selected
/// category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionKind {
    LegacyColor,
    LegacySize,
    Taxonomy(String),
}

impl DimensionKind {
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::LegacyColor | Self::LegacySize)
    }

    /// Option name this dimension contributes to a variation's identity.
    pub fn key_name(&self) -> &str {
        match self {
            Self::LegacyColor => LEGACY_COLOR_KEY,
            Self::LegacySize => LEGACY_SIZE_KEY,
            Self::Taxonomy(name) => name,
        }
    }
}

impl fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyColor => write!(f, "Custom Color"),
            Self::LegacySize => write!(f, "Custom Variation"),
            Self::Taxonomy(name) => write!(f, "{name}"),
        }
    }
}

/// An active dimension with its deduplicated value list, in slot order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDimension {
    pub kind: DimensionKind,
    pub values: Vec<String>,
}

impl OptionDimension {
    pub fn new(kind: DimensionKind, values: Vec<String>) -> Self {
        Self { kind, values }
    }
}
