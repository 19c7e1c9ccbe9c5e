use std::env;
use std::path::PathBuf;

use crate::modules::extractor::ExtractOptions;
use crate::modules::registry::RegistryOptions;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub registry_path: PathBuf,
    pub document_path: PathBuf,
    pub registry_has_headers: bool,
    pub registry_strict: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| {
            lookup(key)
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false)
        };

        Self {
            registry_path: lookup("VESSEL_REGISTRY_PATH")
                .unwrap_or_else(|| "imo-vessel-codes.csv".to_string())
                .into(),
            document_path: lookup("VESSEL_DOCUMENT_PATH")
                .unwrap_or_else(|| "ICES_vessel_sample.xml".to_string())
                .into(),
            registry_has_headers: flag("VESSEL_REGISTRY_HAS_HEADERS"),
            registry_strict: flag("VESSEL_REGISTRY_STRICT"),
        }
    }

    /// Positional `<registry> <document>` arguments override the paths
    pub fn with_args<I: IntoIterator<Item = String>>(mut self, args: I) -> Self {
        let mut args = args.into_iter();
        if let Some(registry) = args.next() {
            self.registry_path = registry.into();
        }
        if let Some(document) = args.next() {
            self.document_path = document.into();
        }
        self
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            registry: RegistryOptions {
                has_headers: self.registry_has_headers,
                strict: self.registry_strict,
            },
            ..Default::default()
        }
    }
}
