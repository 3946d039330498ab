//! Multi-run render context assembly.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::data::RunData;
use crate::dictionary::{DictEntry, MetricDictionary, BLOCK_PROP_KEYS, CLUSTER_PERF_KEYS};
use crate::errors::{ReportError, Result};
use crate::field::FieldRegistry;
use crate::meta::Workload;
use crate::section::SectionSpec;

/// Who produced the report, with which tool, and when.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportIdentity {
    pub author: String,
    pub tool_version: String,
    pub date: DateTime<Utc>,
}

impl ReportIdentity {
    pub fn new(author: impl Into<String>, tool_version: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            tool_version: tool_version.into(),
            date: Utc::now(),
        }
    }

    pub fn at(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMeta {
    pub title: String,
    pub author: String,
    pub date: String,
    pub tool_version: String,
    /// Version of the component under test in the base run.
    pub target: String,
    pub tag: String,
}

/// One run's identity as seen by templates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunInfo {
    pub tag: String,
    pub batch: String,
    pub profile: String,
    pub era: String,
    pub timestamp: String,
    pub name: String,
    pub branch: String,
    pub revision: String,
    pub short_revision: String,
    pub version: String,
    pub workload: Workload,
    pub workload_title: String,
    pub file_infix: String,
}

impl RunInfo {
    pub fn from_run(run: &RunData) -> Self {
        let meta = &run.meta;
        let workload = meta.workload();
        Self {
            tag: meta.tag.clone(),
            batch: meta.batch.clone(),
            profile: meta.profile.clone(),
            era: meta.era.clone(),
            timestamp: meta.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            name: meta.manifest.name.clone(),
            branch: meta.manifest.branch.clone(),
            revision: meta.manifest.revision.clone(),
            short_revision: meta.manifest.short_revision().to_string(),
            version: meta.manifest.version.clone(),
            workload,
            workload_title: workload.title().to_string(),
            file_infix: workload.file_infix().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescription {
    pub name: String,
    pub short_desc: String,
    pub description: String,
    pub unit: String,
    pub precision: u8,
    pub width: u16,
    pub kind: String,
}

/// A section in its column/precision/variable description form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionDescription {
    pub title: String,
    pub name_column: String,
    pub value_column: String,
    pub data_ref: String,
    pub target_file: String,
    pub fields: Vec<FieldDescription>,
}

impl SectionDescription {
    pub fn describe(spec: &SectionSpec, registry: &FieldRegistry) -> Self {
        let fields = spec
            .fields(registry)
            .into_iter()
            .map(|f| FieldDescription {
                name: f.name().to_string(),
                short_desc: f.short_label().to_string(),
                description: f.description().to_string(),
                unit: f.spec().unit.clone(),
                precision: f.precision(),
                width: f.width(),
                kind: f.kind().to_string(),
            })
            .collect();
        Self {
            title: spec.title.clone(),
            name_column: spec.name_column.clone(),
            value_column: spec.value_column.clone(),
            data_ref: spec.data_ref.clone(),
            target_file: spec.target_file.clone(),
            fields,
        }
    }
}

/// Key lists for the chart sections.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartKeys {
    pub cluster_perf: Vec<String>,
    pub block_prop: Vec<String>,
}

impl Default for ChartKeys {
    fn default() -> Self {
        Self {
            cluster_perf: CLUSTER_PERF_KEYS.iter().map(|s| s.to_string()).collect(),
            block_prop: BLOCK_PROP_KEYS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub cluster_perf: Vec<DictEntry>,
    pub block_prop: Vec<DictEntry>,
}

/// Everything a template sees, for one report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderContext {
    pub report: ReportMeta,
    pub base: RunInfo,
    pub runs: Vec<RunInfo>,
    pub summary: SectionDescription,
    pub analyses: Vec<SectionDescription>,
    pub dictionary: MetricDictionary,
    pub charts: Charts,
}

/// Combines run metadata, section descriptions and the dictionary.
#[derive(Debug, Clone)]
pub struct Assembler<'a> {
    registry: &'a FieldRegistry,
    dictionary: &'a MetricDictionary,
    chart_keys: ChartKeys,
}

impl<'a> Assembler<'a> {
    pub fn new(registry: &'a FieldRegistry, dictionary: &'a MetricDictionary) -> Self {
        Self {
            registry,
            dictionary,
            chart_keys: ChartKeys::default(),
        }
    }

    pub fn with_chart_keys(mut self, chart_keys: ChartKeys) -> Self {
        self.chart_keys = chart_keys;
        self
    }

    /// Assemble the context for `base` compared against `comparisons`.
    ///
    /// Comparison runs keep the caller's order. The base run's component
    /// version anchors the report title. At least one comparison run is
    /// required.
    pub fn assemble(
        &self,
        identity: &ReportIdentity,
        base: &RunData,
        comparisons: &[RunData],
        summary: &SectionSpec,
        analyses: &[SectionSpec],
    ) -> Result<RenderContext> {
        if comparisons.is_empty() {
            return Err(ReportError::empty_run_set(format!(
                "no comparison runs supplied for base run '{}'",
                base.tag()
            )));
        }

        let base_info = RunInfo::from_run(base);
        let runs: Vec<RunInfo> = comparisons.iter().map(RunInfo::from_run).collect();

        // Every field a section shows must be documented.
        for spec in std::iter::once(summary).chain(analyses) {
            let keys: Vec<&str> = spec
                .fields(self.registry)
                .into_iter()
                .map(|f| f.name())
                .collect();
            self.dictionary
                .only_keys(&keys, &format!("section '{}'", spec.data_ref))?;
        }

        let charts = Charts {
            cluster_perf: self
                .dictionary
                .only_keys(&self.chart_keys.cluster_perf, "charts.cluster_perf")?,
            block_prop: self
                .dictionary
                .only_keys(&self.chart_keys.block_prop, "charts.block_prop")?,
        };

        let tag = std::iter::once(base_info.tag.as_str())
            .chain(runs.iter().map(|r| r.tag.as_str()))
            .collect::<Vec<_>>()
            .join("-vs-");
        let report = ReportMeta {
            title: format!("{} {}", base_info.version, base_info.workload_title),
            author: identity.author.clone(),
            date: identity.date.to_rfc3339_opts(SecondsFormat::Secs, true),
            tool_version: identity.tool_version.clone(),
            target: base_info.version.clone(),
            tag,
        };

        tracing::debug!(
            base = %base_info.tag,
            comparisons = runs.len(),
            analyses = analyses.len(),
            "assembled render context"
        );

        Ok(RenderContext {
            report,
            base: base_info,
            runs,
            summary: SectionDescription::describe(summary, self.registry),
            analyses: analyses
                .iter()
                .map(|s| SectionDescription::describe(s, self.registry))
                .collect(),
            dictionary: self.dictionary.clone(),
            charts,
        })
    }
}
