//! Domain error types
//!
//! Only whole-run failures live here. A concept that cannot be matched is not
//! an error; see `modules::extractor::SkipReason`.

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ExtractionError {
    /// Input file missing or unreadable
    Io { path: PathBuf, source: std::io::Error },
    /// CSV reader failure (bad quoting, invalid UTF-8, ...)
    Csv { path: PathBuf, source: csv::Error },
    /// Registry row with fewer than two fields (strict mode only)
    MalformedRow {
        path: PathBuf,
        line: u64,
        fields: usize,
    },
    /// Document is not well-formed XML
    DocumentParse { path: PathBuf, reason: String },
}

impl ExtractionError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn csv(path: &Path, source: csv::Error) -> Self {
        ExtractionError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn document(path: &Path, reason: impl Into<String>) -> Self {
        ExtractionError::DocumentParse {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// File the failure relates to
    pub fn path(&self) -> &Path {
        match self {
            ExtractionError::Io { path, .. }
            | ExtractionError::Csv { path, .. }
            | ExtractionError::MalformedRow { path, .. }
            | ExtractionError::DocumentParse { path, .. } => path,
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::Io { path, source } => {
                write!(f, "Cannot read {}: {}", path.display(), source)
            }
            ExtractionError::Csv { path, source } => {
                write!(f, "CSV error in {}: {}", path.display(), source)
            }
            ExtractionError::MalformedRow { path, line, fields } => write!(
                f,
                "Malformed row in {} at line {}: expected at least 2 fields, found {}",
                path.display(),
                line,
                fields
            ),
            ExtractionError::DocumentParse { path, reason } => {
                write!(f, "XML parse error in {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for ExtractionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractionError::Io { source, .. } => Some(source),
            ExtractionError::Csv { source, .. } => Some(source),
            _ => None,
        }
    }
}
