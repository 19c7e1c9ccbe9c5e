//! Vessel extraction
//!
//! Crosses the concepts of a SKOS vessel taxonomy with the IMO registry.
//! Each concept either yields a [`VesselRecord`] or is skipped for a known
//! reason; only unreadable inputs abort the run.

use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

use crate::domain::{ExtractionError, Registry, VesselRecord};
use crate::modules::registry::{RegistryOptions, load_registry_with};
use crate::modules::taxonomy::{Element, parse_document};

/// Element names used to find concepts and their fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub concept: String,
    pub label: String,
    pub definition: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            concept: "skos:Concept".to_string(),
            label: "skos:prefLabel".to_string(),
            definition: "skos:definition".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub registry: RegistryOptions,
    pub vocabulary: Vocabulary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    MissingDefinition,
    /// Not JSON, or JSON but not an object
    InvalidJson,
    MissingImo,
    UnknownImo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConceptOutcome {
    Matched(VesselRecord),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub concepts: usize,
    pub matched: usize,
    pub missing_definition: usize,
    pub invalid_json: usize,
    pub missing_imo: usize,
    pub unknown_imo: usize,
}

impl ExtractionStats {
    fn record(&mut self, outcome: &ConceptOutcome) {
        self.concepts += 1;
        match outcome {
            ConceptOutcome::Matched(_) => self.matched += 1,
            ConceptOutcome::Skipped(SkipReason::MissingDefinition) => self.missing_definition += 1,
            ConceptOutcome::Skipped(SkipReason::InvalidJson) => self.invalid_json += 1,
            ConceptOutcome::Skipped(SkipReason::MissingImo) => self.missing_imo += 1,
            ConceptOutcome::Skipped(SkipReason::UnknownImo) => self.unknown_imo += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.concepts - self.matched
    }
}

#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: HashSet<VesselRecord>,
    pub stats: ExtractionStats,
}

/// Build the set of `(IMO, name, MMSI)` records for the ships of the
/// document whose IMO number appears in the registry.
pub fn extract_vessels(
    registry_path: impl AsRef<Path>,
    document_path: impl AsRef<Path>,
) -> Result<HashSet<VesselRecord>, ExtractionError> {
    extract_with(registry_path, document_path, &ExtractOptions::default())
        .map(|extraction| extraction.records)
}

pub fn extract_with(
    registry_path: impl AsRef<Path>,
    document_path: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<Extraction, ExtractionError> {
    // Registry is fully loaded before any lookup
    let registry = load_registry_with(registry_path, &options.registry)?;
    let root = parse_document(document_path.as_ref())?;

    let extraction = extract_from(&registry, &root, &options.vocabulary);
    let stats = &extraction.stats;
    tracing::info!(
        "Extracted {} vessels from {} concepts in {} (skipped: {} without definition, {} invalid JSON, {} without IMO, {} unknown IMO)",
        extraction.records.len(),
        stats.concepts,
        document_path.as_ref().display(),
        stats.missing_definition,
        stats.invalid_json,
        stats.missing_imo,
        stats.unknown_imo
    );

    Ok(extraction)
}

/// Match every concept in `root`, the root itself included, against an already loaded registry
pub fn extract_from(registry: &Registry, root: &Element, vocabulary: &Vocabulary) -> Extraction {
    let mut extraction = Extraction::default();

    for concept in root.self_and_descendants_named(&vocabulary.concept) {
        let outcome = match_concept(concept, registry, vocabulary);
        extraction.stats.record(&outcome);

        match outcome {
            ConceptOutcome::Matched(record) => {
                extraction.records.insert(record);
            }
            ConceptOutcome::Skipped(reason) => {
                tracing::debug!(
                    "Skipping concept {}: {:?}",
                    concept.attribute("rdf:about").unwrap_or("<anonymous>"),
                    reason
                );
            }
        }
    }

    extraction
}

pub fn match_concept(concept: &Element, registry: &Registry, vocabulary: &Vocabulary) -> ConceptOutcome {
    let Some(definition) = concept.child(&vocabulary.definition) else {
        return ConceptOutcome::Skipped(SkipReason::MissingDefinition);
    };

    let imo = match definition_imo(&definition.text()) {
        Ok(imo) => imo,
        Err(reason) => return ConceptOutcome::Skipped(reason),
    };

    let Some(mmsi) = registry.get(&imo) else {
        return ConceptOutcome::Skipped(SkipReason::UnknownImo);
    };

    // Only the concept's own label, never the collection's
    let name = concept
        .child(&vocabulary.label)
        .map(Element::text)
        .unwrap_or_default();

    ConceptOutcome::Matched(VesselRecord::new(imo, name, mmsi))
}

/// IMO number from a JSON definition such as
/// `{"country": "United States", "IMO": "8219384", "callsign": "NBOB"}`.
/// An integer IMO (`"IMO": 8219384`) is looked up by its decimal form.
fn definition_imo(definition: &str) -> Result<String, SkipReason> {
    let value: Value = serde_json::from_str(definition).map_err(|_| SkipReason::InvalidJson)?;
    let object = value.as_object().ok_or(SkipReason::InvalidJson)?;

    match object.get("IMO") {
        Some(Value::String(imo)) => Ok(imo.clone()),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        _ => Err(SkipReason::MissingImo),
    }
}
