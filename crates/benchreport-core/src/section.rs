//! Section building: selected fields of one run, formatted as display rows.

use std::collections::HashMap;

use serde::Serialize;

use crate::cdf::format_fixed;
use crate::data::{MetricTable, RunData};
use crate::errors::{ReportError, Result};
use crate::field::{Category, Field, FieldGroup, FieldRegistry, FieldSelector};

/// Definition of one report table, independent of run data.
#[derive(Debug, Clone)]
pub struct SectionSpec {
    pub title: String,
    pub name_column: String,
    pub value_column: String,
    /// Identifier shared by every format's rendering of this table.
    pub data_ref: String,
    /// Stem of the standalone table file.
    pub target_file: String,
    pub category: Category,
    pub selector: FieldSelector,
}

impl SectionSpec {
    pub fn new(
        title: impl Into<String>,
        data_ref: impl Into<String>,
        category: Category,
        selector: FieldSelector,
    ) -> Self {
        let data_ref = data_ref.into();
        Self {
            title: title.into(),
            name_column: "Metric".to_string(),
            value_column: "Average".to_string(),
            target_file: data_ref.clone(),
            data_ref,
            category,
            selector,
        }
    }

    pub fn columns(mut self, name_column: impl Into<String>, value_column: impl Into<String>) -> Self {
        self.name_column = name_column.into();
        self.value_column = value_column.into();
        self
    }

    pub fn target_file(mut self, target_file: impl Into<String>) -> Self {
        self.target_file = target_file.into();
        self
    }

    /// Fields this section shows, in registry order.
    pub fn fields<'r>(&self, registry: &'r FieldRegistry) -> Vec<&'r Field> {
        registry
            .fields_for(self.category)
            .into_iter()
            .filter(|f| self.selector.matches(f))
            .collect()
    }

    /// Build this section over one run's table.
    pub fn build(&self, registry: &FieldRegistry, data: &RunData) -> Result<Section> {
        let mut section = build(
            registry,
            data.table(self.category),
            &self.selector,
            &self.title,
            &self.name_column,
            &self.value_column,
        )
        .map_err(|e| match e {
            ReportError::UnknownField { name, .. } => ReportError::unknown_field_in(
                name,
                format!("{} of run '{}'", self.category, data.tag()),
            ),
            other => other,
        })?;
        section.data_ref = self.data_ref.clone();
        section.target_file = self.target_file.clone();
        Ok(section)
    }

    /// Build this section for each run, keeping run order.
    pub fn build_runs(&self, registry: &FieldRegistry, runs: &[&RunData]) -> Result<SectionSet> {
        let columns = runs
            .iter()
            .map(|run| -> Result<RunSection> {
                Ok(RunSection {
                    tag: run.tag().to_string(),
                    section: self.build(registry, run)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            section = %self.data_ref,
            runs = columns.len(),
            "built section"
        );
        Ok(SectionSet {
            spec: self.clone(),
            columns,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub field: String,
    pub label: String,
    pub value: String,
    pub width: u16,
}

/// One run's rows for one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub name_column: String,
    pub value_column: String,
    pub data_ref: String,
    pub target_file: String,
    pub rows: Vec<Row>,
}

/// Format every field of `table` chosen by `selector`.
///
/// Rows follow registry declaration order. A selector matching nothing
/// yields an empty section.
pub fn build(
    registry: &FieldRegistry,
    table: &dyn MetricTable,
    selector: &FieldSelector,
    title: &str,
    name_column: &str,
    value_column: &str,
) -> Result<Section> {
    let category = table.category();
    let rows = registry
        .fields_for(category)
        .into_iter()
        .filter(|f| selector.matches(f))
        .map(|field| -> Result<Row> {
            Ok(Row {
                field: field.name().to_string(),
                label: field.short_label().to_string(),
                value: format_field(field, table)?,
                width: field.width(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let data_ref = slug(title);
    Ok(Section {
        title: title.to_string(),
        name_column: name_column.to_string(),
        value_column: value_column.to_string(),
        target_file: data_ref.clone(),
        data_ref,
        rows,
    })
}

fn format_field(field: &Field, table: &dyn MetricTable) -> Result<String> {
    let precision = i32::from(field.precision());
    match field {
        Field::Instant(spec) => {
            let value = table
                .instant(&spec.name)
                .ok_or_else(|| ReportError::unknown_field_in(&spec.name, table.category().as_str()))?;
            format_fixed(value, precision)
        }
        Field::Distributional { spec, stat } => {
            let cdf = table
                .distribution(&spec.name)
                .ok_or_else(|| ReportError::unknown_field_in(&spec.name, table.category().as_str()))?;
            cdf.format_stat(*stat, precision)
        }
    }
}

fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}

/// One run's section, labelled with the run tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSection {
    pub tag: String,
    pub section: Section,
}

/// A section built for every run of the report, one entry per run.
#[derive(Debug, Clone)]
pub struct SectionSet {
    pub spec: SectionSpec,
    pub columns: Vec<RunSection>,
}

/// Table key the renderer reserves for the run list.
pub const MANIFEST_DATA_REF: &str = "manifest";

/// Reject layouts where two sections share a `data_ref` or `target_file`, or
/// a section claims the manifest's table key.
pub fn check_layout<'a, I>(specs: I) -> Result<()>
where
    I: IntoIterator<Item = &'a SectionSpec>,
{
    let mut data_refs: HashMap<&str, &str> = HashMap::new();
    let mut files: HashMap<&str, &str> = HashMap::new();
    for spec in specs {
        if spec.data_ref == MANIFEST_DATA_REF {
            return Err(ReportError::SectionCollision {
                what: "data_ref",
                name: spec.data_ref.clone(),
                other: "the run manifest".to_string(),
            });
        }
        if let Some(first) = data_refs.insert(&spec.data_ref, &spec.title) {
            return Err(ReportError::SectionCollision {
                what: "data_ref",
                name: spec.data_ref.clone(),
                other: format!("section '{}'", first),
            });
        }
        if let Some(first) = files.insert(&spec.target_file, &spec.title) {
            return Err(ReportError::SectionCollision {
                what: "target_file",
                name: spec.target_file.clone(),
                other: format!("section '{}'", first),
            });
        }
    }
    Ok(())
}

/// The run summary table.
pub fn summary_section() -> SectionSpec {
    SectionSpec::new(
        "Run summary",
        "summary",
        Category::Summary,
        FieldSelector::group(FieldGroup::Run),
    )
    .columns("Parameter", "Value")
}

/// The analysis tables, in report order.
pub fn analysis_sections() -> Vec<SectionSpec> {
    vec![
        SectionSpec::new(
            "Resource Usage",
            "resources",
            Category::MachPerf,
            FieldSelector::group(FieldGroup::Resource),
        ),
        SectionSpec::new(
            "Forging",
            "forging",
            Category::MachPerf,
            FieldSelector::group(FieldGroup::Forging),
        ),
        SectionSpec::new(
            "Peer propagation",
            "peers",
            Category::BlockProp,
            FieldSelector::group(FieldGroup::PeerPropagation),
        ),
        SectionSpec::new(
            "End-to-end propagation",
            "endtoend",
            Category::BlockProp,
            FieldSelector::group(FieldGroup::EndToEnd),
        ),
    ]
}
