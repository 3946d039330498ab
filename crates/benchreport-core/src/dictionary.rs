//! Metric dictionary and its only-keys projection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ReportError, Result};
use crate::field::FieldRegistry;

/// Keys charted in the cluster performance section.
pub const CLUSTER_PERF_KEYS: &[&str] = &[
    "cpu_process",
    "cpu_gc",
    "cpu_mutator",
    "rss",
    "heap",
    "alloc_rate",
    "net_read",
    "net_write",
    "fs_read",
    "fs_write",
    "slot_start",
    "leadership",
    "forge",
    "block_gap",
];

/// Keys charted in the block propagation section.
pub const BLOCK_PROP_KEYS: &[&str] = &[
    "notice",
    "request",
    "fetched",
    "adopted",
    "announced",
    "sent",
    "prop_0_50",
    "prop_0_80",
    "prop_0_90",
    "prop_0_96",
    "prop_1_00",
    "block_size",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDef {
    pub short_desc: String,
    pub description: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub precision: u8,
    /// "instant" or "distributional".
    pub kind: String,
}

/// A projected dictionary entry, keeping its key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictEntry {
    pub key: String,
    #[serde(flatten)]
    pub def: MetricDef,
}

/// Full metric catalog: name -> definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricDictionary {
    entries: BTreeMap<String, MetricDef>,
}

impl MetricDictionary {
    pub fn new(entries: BTreeMap<String, MetricDef>) -> Self {
        Self { entries }
    }

    /// Dictionary documenting every field of the registry.
    pub fn from_registry(registry: &FieldRegistry) -> Self {
        let entries = registry
            .iter()
            .map(|f| {
                (
                    f.name().to_string(),
                    MetricDef {
                        short_desc: f.short_label().to_string(),
                        description: f.description().to_string(),
                        unit: f.spec().unit.clone(),
                        precision: f.precision(),
                        kind: f.kind().to_string(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&MetricDef> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries for exactly `keys`, in the given order.
    ///
    /// A key absent from the dictionary fails the projection instead of being
    /// dropped. `referenced_by` names the caller in the error.
    pub fn only_keys<S: AsRef<str>>(&self, keys: &[S], referenced_by: &str) -> Result<Vec<DictEntry>> {
        keys.iter()
            .map(|key| {
                let key = key.as_ref();
                self.entries
                    .get(key)
                    .map(|def| DictEntry {
                        key: key.to_string(),
                        def: def.clone(),
                    })
                    .ok_or_else(|| ReportError::MissingMetricDefinition {
                        key: key.to_string(),
                        referenced_by: referenced_by.to_string(),
                    })
            })
            .collect()
    }
}
