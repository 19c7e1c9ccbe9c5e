//! Domain layer - Pure data types
//!
//! This layer knows nothing about CSV or XML.
//! Only the record types and the domain error type.

pub mod errors;
pub mod models;

pub use errors::ExtractionError;
pub use models::{Registry, VesselRecord};
