// src/matrix/identity.rs - Stable variation identity keys

use std::collections::BTreeMap;

use crate::model::Variation;

/// Option name used for the legacy free-text color field when folding it
/// into an identity key.
pub const LEGACY_COLOR_KEY: &str = "color";
/// Option name used for the legacy free-text size field.
pub const LEGACY_SIZE_KEY: &str = "size";

/// Identity of a variation: the full set of (option name, values) pairs.
///
/// Two variations are the same identity iff their pair sets match exactly,
/// including which options are present. Comparison is exact-string with no
/// case normalization; value lists compare order-insensitively. Legacy
/// color/size fields participate as options named "color"/"size".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VariationKey(BTreeMap<String, Vec<String>>);

impl VariationKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one option's values to the key. Values are stored sorted so the
    /// key is insensitive to the order they were entered in.
    pub fn insert(&mut self, name: impl Into<String>, mut values: Vec<String>) {
        values.sort();
        self.0.insert(name.into(), values);
    }

    pub fn with(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.insert(name, values);
        self
    }

    /// Computes the identity of an existing variation record.
    pub fn of(variation: &Variation) -> Self {
        let mut key = Self::new();
        if let Some(color) = &variation.color {
            key.insert(LEGACY_COLOR_KEY, vec![color.clone()]);
        }
        if let Some(size) = &variation.size {
            key.insert(LEGACY_SIZE_KEY, vec![size.clone()]);
        }
        if let Some(options) = &variation.options {
            for (name, values) in options {
                key.insert(name.clone(), values.clone());
            }
        }
        key
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn option_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
