// src/model/measurement.rs - Unit-price measurement configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis a unit price is quoted against. Each variation then carries a
/// quantity value in the same measurement so the storefront can derive a
/// per-unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasurementType {
    Volume,
    Area,
    Count,
    Length,
    Weight,
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Volume => write!(f, "Volume"),
            Self::Area => write!(f, "Area"),
            Self::Count => write!(f, "Per unit"),
            Self::Length => write!(f, "Length"),
            Self::Weight => write!(f, "Weight"),
        }
    }
}

/// Unit-price reference for the whole product. The reference value must be a
/// positive integer; the unit string is one of the platform's unit codes for
/// the chosen measurement type (e.g. "GRAM", "LITER").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPrice {
    pub measurement: MeasurementType,
    pub unit: String,
    pub reference_value: u32,
}

impl UnitPrice {
    pub fn is_valid(&self) -> bool {
        self.reference_value > 0 && !self.unit.is_empty()
    }
}
