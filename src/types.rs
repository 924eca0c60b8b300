// src/types.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generic metadata map attached to errors and notifications.
pub type Metadata = std::collections::HashMap<String, serde_json::Value>;

/// Identifies a warehouse holding inventory for a variation.
pub type WarehouseId = String;

/// ISO 4217 currency code, e.g. "USD".
pub type CurrencyCode = String;

/// Client-side identity of a variation. Generated once when the record enters
/// the working set and never reused; stable across edits and reconciliations
/// so in-flight edits bound to it remain valid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
