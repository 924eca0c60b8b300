// src/lib.rs

//! Listing Form - merchant add/edit product form state with a variation
//! matrix manager

#![deny(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::result_large_err)]

pub mod error;
pub mod matrix;
pub mod model;
pub mod notify;
pub mod state;
pub mod submit;
pub mod taxonomy;
pub mod types;
pub mod validate;

// Re-export commonly used types
pub use error::{Error, ErrorKind, Result, ResultExt};
pub use matrix::{DimensionKind, OptionDimension, VariationKey, MAX_OPTION_SLOTS};
pub use model::Variation;
pub use state::{ApplyOutcome, FormStore, ProductFormState};
pub use types::ClientId;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
