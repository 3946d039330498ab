//! Rendering of an assembled report into its output formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::RenderContext;
use crate::errors::{ReportError, Result};
use crate::section::{check_layout, SectionSet, MANIFEST_DATA_REF};

mod latex;
mod org;
pub mod table;
pub mod template;
pub mod templates;
mod text;

pub use table::{Table, TableRow};
pub use template::{EngineError, PlaceholderEngine, TemplateEngine};
pub use templates::TemplateSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Org,
    Latex,
    Text,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Org, OutputFormat::Latex, OutputFormat::Text];

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Org => "org",
            OutputFormat::Latex => "latex",
            OutputFormat::Text => "text",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Org => "org",
            OutputFormat::Latex => "tex",
            OutputFormat::Text => "txt",
        }
    }

    fn table(self, table: &Table) -> String {
        match self {
            OutputFormat::Org => org::table(table),
            OutputFormat::Latex => latex::table(table),
            OutputFormat::Text => text::table(table),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "org" => Ok(OutputFormat::Org),
            "latex" | "tex" => Ok(OutputFormat::Latex),
            "text" | "txt" => Ok(OutputFormat::Text),
            other => Err(format!(
                "unknown output format '{}' (expected org, latex or text)",
                other
            )),
        }
    }
}

/// A standalone table file written next to the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableFile {
    pub filename: String,
    pub text: String,
}

/// One format's rendered report plus what produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub format: OutputFormat,
    pub filename: String,
    pub text: String,
    pub tables: Vec<TableFile>,
    /// Template source used, kept for diagnostics.
    pub template_source: String,
    /// The full template context, pretty-printed.
    pub context_json: String,
}

/// Renders contexts through a [`TemplateEngine`].
#[derive(Debug, Clone, Default)]
pub struct Renderer<E> {
    engine: E,
}

impl<E: TemplateEngine> Renderer<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Render one format.
    ///
    /// Each section set is transposed to a table and written in the target
    /// format under `tables.<data_ref>`; `tables.manifest` lists the runs and
    /// `tables_all` joins every table except the run summary. Section sets
    /// must pass [`check_layout`].
    pub fn render(
        &self,
        format: OutputFormat,
        template: &str,
        context: &RenderContext,
        sections: &[SectionSet],
    ) -> Result<Rendered> {
        check_layout(sections.iter().map(|s| &s.spec))?;

        let mut tree = serde_json::to_value(context)?;
        if format == OutputFormat::Latex {
            escape_strings(&mut tree);
        }

        let manifest = format.table(&Table::manifest(context));
        let mut tables = Map::new();
        tables.insert(MANIFEST_DATA_REF.to_string(), Value::String(manifest));

        let mut files = Vec::with_capacity(sections.len());
        let mut all = Vec::new();
        for set in sections {
            let text = format.table(&Table::transpose(set)?);
            if set.spec.data_ref != context.summary.data_ref {
                all.push(text.clone());
            }
            files.push(TableFile {
                filename: format!("{}.{}", set.spec.target_file, format.extension()),
                text: text.clone(),
            });
            tables.insert(set.spec.data_ref.clone(), Value::String(text));
        }

        if let Value::Object(root) = &mut tree {
            root.insert("tables".to_string(), Value::Object(tables));
            root.insert("tables_all".to_string(), Value::String(all.join("\n")));
            root.insert("format".to_string(), Value::String(format.name().to_string()));
        }

        let context_json = serde_json::to_string_pretty(&tree)?;
        let text = self
            .engine
            .render(template, &tree)
            .map_err(|e| ReportError::template(format.name(), e.0))?;

        let filename = format!("report-{}.{}", context.base.file_infix, format.extension());
        tracing::info!(
            format = format.name(),
            file = %filename,
            tables = files.len(),
            "rendered report"
        );

        Ok(Rendered {
            format,
            filename,
            text,
            tables: files,
            template_source: template.to_string(),
            context_json,
        })
    }
}

fn escape_strings(value: &mut Value) {
    match value {
        Value::String(s) => *s = latex::escape(s),
        Value::Array(items) => items.iter_mut().for_each(escape_strings),
        Value::Object(map) => map.values_mut().for_each(escape_strings),
        _ => {}
    }
}
