//! Vessel records and the IMO registry

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A ship found in the taxonomy whose IMO number is known to the registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VesselRecord {
    pub imo: String,
    pub name: String,
    /// Taken from the registry, never from the document
    pub mmsi: String,
}

impl VesselRecord {
    pub fn new(imo: impl Into<String>, name: impl Into<String>, mmsi: impl Into<String>) -> Self {
        Self {
            imo: imo.into(),
            name: name.into(),
            mmsi: mmsi.into(),
        }
    }
}

impl From<VesselRecord> for (String, String, String) {
    fn from(record: VesselRecord) -> Self {
        (record.imo, record.name, record.mmsi)
    }
}

/// IMO number -> MMSI, one value per IMO (last row wins)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: HashMap<String, String>,
    skipped_rows: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; returns the MMSI previously stored for this IMO
    pub fn upsert(&mut self, imo: impl Into<String>, mmsi: impl Into<String>) -> Option<String> {
        self.entries.insert(imo.into(), mmsi.into())
    }

    pub fn get(&self, imo: &str) -> Option<&str> {
        self.entries.get(imo).map(String::as_str)
    }

    pub fn contains(&self, imo: &str) -> bool {
        self.entries.contains_key(imo)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows with fewer than two fields tolerated while loading
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub(crate) fn record_skipped_row(&mut self) {
        self.skipped_rows += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Registry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut registry = Registry::new();
        for (imo, mmsi) in iter {
            registry.upsert(imo, mmsi);
        }
        registry
    }
}
