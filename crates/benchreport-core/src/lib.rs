//! Comparative benchmark reports for cluster performance runs.
//!
//! Pipeline: per-run metric tables -> sections -> render context -> one text
//! per output format, through a pluggable template engine.

pub mod cdf;
pub mod context;
pub mod data;
pub mod dictionary;
pub mod errors;
pub mod field;
pub mod meta;
pub mod render;
pub mod report;
pub mod section;

// Convenience re-exports
pub use cdf::{format_fixed, Cdf, Centile, Stat};
pub use context::{Assembler, ChartKeys, RenderContext, ReportIdentity};
pub use data::{BlockProp, MachPerf, MetricTable, RunData, Summary};
pub use dictionary::{DictEntry, MetricDef, MetricDictionary, BLOCK_PROP_KEYS, CLUSTER_PERF_KEYS};
pub use errors::{ReportError, Result};
pub use field::{Category, Field, FieldGroup, FieldRegistry, FieldSelector, FieldSpec};
pub use meta::{GeneratorProfile, Manifest, Metadata, Workload};
pub use render::{
    EngineError, OutputFormat, PlaceholderEngine, Rendered, Renderer, TableFile, TemplateEngine,
    TemplateSet,
};
pub use report::ReportGenerator;
pub use section::{analysis_sections, summary_section, Section, SectionSet, SectionSpec};
