//! IMO registry loader
//!
//! Reads the `<IMO #>,<MMSI>,<NAME>,<FLAG>,<TYPE>` vessel-code list into a
//! [`Registry`]. Only the first two fields are used.

use std::fs::File;
use std::path::Path;

use crate::domain::{ExtractionError, Registry};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Treat the first row as a header and skip it
    pub has_headers: bool,
    /// Fail on a row with fewer than two fields instead of skipping it
    pub strict: bool,
}

/// Load the registry with every row treated as data and short rows skipped
pub fn load_registry(path: impl AsRef<Path>) -> Result<Registry, ExtractionError> {
    load_registry_with(path, &RegistryOptions::default())
}

pub fn load_registry_with(
    path: impl AsRef<Path>,
    options: &RegistryOptions,
) -> Result<Registry, ExtractionError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ExtractionError::io(path, e))?;
    let registry = read_registry(file, path, options)?;

    tracing::info!(
        "Loaded {} IMO numbers from {} ({} malformed rows skipped)",
        registry.len(),
        path.display(),
        registry.skipped_rows()
    );

    Ok(registry)
}

/// `path` is only used to label errors
pub(crate) fn read_registry<R: std::io::Read>(
    source: R,
    path: &Path,
    options: &RegistryOptions,
) -> Result<Registry, ExtractionError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(options.has_headers)
        .flexible(true)
        .from_reader(source);

    let mut registry = Registry::new();

    for result in rdr.records() {
        let record = result.map_err(|e| ExtractionError::csv(path, e))?;

        match (record.get(0), record.get(1)) {
            (Some(imo), Some(mmsi)) => {
                registry.upsert(imo, mmsi);
            }
            _ => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                if options.strict {
                    return Err(ExtractionError::MalformedRow {
                        path: path.to_path_buf(),
                        line,
                        fields: record.len(),
                    });
                }
                tracing::warn!(
                    "Skipping registry row at {}:{} ({} field(s))",
                    path.display(),
                    line,
                    record.len()
                );
                registry.record_skipped_row();
            }
        }
    }

    Ok(registry)
}
