//! Text analysis layer
//!
//! Turns recognized text lines into structured label fields.

pub mod fields;

pub use fields::{extract_fields, ExtractionResult};
