use std::collections::{BTreeMap, HashMap};

use include_dir::{include_dir, Dir};
use once_cell::sync::Lazy;
use serde::Deserialize;

static MAPPING_DIR: Dir<'_> = include_dir!("config/mappings");

/// Static per-domain mapping config: which upstream resource to query, how
/// request parameters translate into upstream field names, where the chart
/// fields live inside a response row, and the display color cycle.
///
/// Loaded once from the embedded `config/mappings/` JSON files; immutable
/// for the life of the process.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainMapping {
    pub resource: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub search: Vec<String>,
    #[serde(default)]
    pub paths: BTreeMap<String, String>,
    #[serde(default)]
    pub colors: Vec<String>,
}

impl DomainMapping {
    /// Upstream filter field for a request parameter key, if this domain
    /// recognizes it.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Row path for a logical chart field. Falls back to the key itself so
    /// flat upstream rows need no mapping entry.
    pub fn path<'a>(&'a self, key: &'a str) -> &'a str {
        self.paths.get(key).map(String::as_str).unwrap_or(key)
    }
}

static MAPPINGS: Lazy<HashMap<String, DomainMapping>> = Lazy::new(|| {
    MAPPING_DIR
        .files()
        .iter()
        .map(|file| {
            let name = file
                .path()
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default();
            let mapping: DomainMapping =
                serde_json::from_slice(file.contents()).unwrap_or_else(|err| {
                    panic!("invalid mapping config {}: {}", file.path().display(), err)
                });
            (name, mapping)
        })
        .collect()
});

/// Look up a domain's mapping config. The domain names are compile-time
/// constants, so a miss is a packaging bug.
pub fn domain(name: &str) -> &'static DomainMapping {
    MAPPINGS
        .get(name)
        .unwrap_or_else(|| panic!("unknown mapping domain: {}", name))
}
