pub mod domain;
pub mod infrastructure;
pub mod modules;

pub use domain::{ExtractionError, Registry, VesselRecord};
pub use modules::extractor::{
    ConceptOutcome, ExtractOptions, Extraction, ExtractionStats, SkipReason, Vocabulary,
    extract_from, extract_vessels, extract_with, match_concept,
};
pub use modules::registry::{RegistryOptions, load_registry, load_registry_with};
