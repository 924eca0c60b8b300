// src/model/mod.rs

//! Data model for the add/edit product form: variations, customs and
//! logistics declarations, and unit-price measurements.

mod customs;
mod measurement;
mod variation;

pub use customs::{CustomsLogistics, InventoryOnHand};
pub use measurement::{MeasurementType, UnitPrice};
pub use variation::{AttributeValues, ImageRef, OptionSelections, Variation};
