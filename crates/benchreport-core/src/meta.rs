//! Run identity: metadata, component manifest and workload classification.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Build identity of the component under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Component name, e.g. the node executable.
    pub name: String,
    pub branch: String,
    /// Commit hash.
    pub revision: String,
    pub version: String,
}

impl Manifest {
    /// Short revision for titles and column headers.
    pub fn short_revision(&self) -> &str {
        let end = self
            .revision
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.revision.len());
        &self.revision[..end]
    }
}

/// Transaction generator settings of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorProfile {
    pub tps: f64,
    pub tx_count: u64,
    pub inputs_per_tx: u32,
    pub outputs_per_tx: u32,
    /// Plutus script driving the workload; absent for value-only workloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plutus_script: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Short run identifier.
    pub tag: String,
    pub batch: String,
    pub profile: String,
    pub era: String,
    pub timestamp: DateTime<Utc>,
    pub manifest: Manifest,
    pub generator: GeneratorProfile,
}

impl Metadata {
    pub fn workload(&self) -> Workload {
        Workload::classify(&self.generator)
    }
}

/// Generator workload class, derived from the Plutus script in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Workload {
    ValueOnly,
    PlutusCountdownLoop,
    PlutusSecpLoop,
    PlutusOther,
}

impl Workload {
    pub fn classify(generator: &GeneratorProfile) -> Workload {
        let Some(script) = generator.plutus_script.as_deref() else {
            return Workload::ValueOnly;
        };
        // Scripts may be given as paths to compiled files.
        let stem = script
            .rsplit('/')
            .next()
            .unwrap_or(script)
            .split('.')
            .next()
            .unwrap_or(script);

        if stem.contains("Secp256k1") {
            Workload::PlutusSecpLoop
        } else if stem == "Loop" {
            Workload::PlutusCountdownLoop
        } else {
            Workload::PlutusOther
        }
    }

    /// Token used in output file names.
    pub fn file_infix(&self) -> &'static str {
        match self {
            Workload::ValueOnly => "value-only",
            Workload::PlutusCountdownLoop => "plutus",
            Workload::PlutusSecpLoop => "plutus-secp",
            Workload::PlutusOther => "plutus-other",
        }
    }

    /// Human readable name used in report titles.
    pub fn title(&self) -> &'static str {
        match self {
            Workload::ValueOnly => "value-only",
            Workload::PlutusCountdownLoop => "Plutus countdown loop",
            Workload::PlutusSecpLoop => "Plutus SECP loop",
            Workload::PlutusOther => "Plutus (other)",
        }
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
