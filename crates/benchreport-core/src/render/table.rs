//! Format-agnostic tables: one row per field, one value column per run.

use crate::context::RenderContext;
use crate::errors::{ReportError, Result};
use crate::section::{SectionSet, MANIFEST_DATA_REF};

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub label: String,
    pub values: Vec<String>,
    /// Minimum display width of the values.
    pub width: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: String,
    pub data_ref: String,
    pub name_column: String,
    /// One header per value column.
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Transpose per-run sections (one row per run) into one row per field.
    ///
    /// Every run must carry the same fields in the same order; the first
    /// run's labels become the table's row labels.
    pub fn transpose(set: &SectionSet) -> Result<Table> {
        let spec = &set.spec;
        let first = set.columns.first().ok_or_else(|| {
            ReportError::empty_run_set(format!("section '{}' has no runs", spec.data_ref))
        })?;

        for column in &set.columns[1..] {
            let expected = first.section.rows.iter().map(|r| r.field.as_str());
            let actual = column.section.rows.iter().map(|r| r.field.as_str());
            if let Some((_, found)) = expected
                .zip(actual)
                .find(|(e, a)| e != a)
            {
                return Err(ReportError::unknown_field_in(
                    found,
                    format!("run '{}' of section '{}'", column.tag, spec.data_ref),
                ));
            }
            if column.section.rows.len() != first.section.rows.len() {
                return Err(ReportError::unknown_field_in(
                    format!("<{} rows>", column.section.rows.len()),
                    format!("run '{}' of section '{}'", column.tag, spec.data_ref),
                ));
            }
        }

        let rows = first
            .section
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| TableRow {
                label: row.label.clone(),
                values: set
                    .columns
                    .iter()
                    .map(|c| c.section.rows[i].value.clone())
                    .collect(),
                width: row.width,
            })
            .collect();

        Ok(Table {
            title: spec.title.clone(),
            data_ref: spec.data_ref.clone(),
            name_column: spec.name_column.clone(),
            headers: set
                .columns
                .iter()
                .map(|c| format!("{} ({})", spec.value_column, c.tag))
                .collect(),
            rows,
        })
    }

    /// Identity of every run: base first, then comparisons.
    pub fn manifest(context: &RenderContext) -> Table {
        let runs: Vec<_> = std::iter::once(&context.base)
            .chain(&context.runs)
            .collect();
        let row = |label: &str, value: &dyn Fn(usize) -> String| TableRow {
            label: label.to_string(),
            values: (0..runs.len()).map(value).collect(),
            width: 1,
        };

        Table {
            title: "Runs".to_string(),
            data_ref: MANIFEST_DATA_REF.to_string(),
            name_column: "Run".to_string(),
            headers: runs.iter().map(|r| r.tag.clone()).collect(),
            rows: vec![
                row("Component", &|i| runs[i].name.clone()),
                row("Version", &|i| runs[i].version.clone()),
                row("Branch", &|i| runs[i].branch.clone()),
                row("Revision", &|i| runs[i].short_revision.clone()),
                row("Workload", &|i| runs[i].workload_title.clone()),
                row("Profile", &|i| runs[i].profile.clone()),
                row("Era", &|i| runs[i].era.clone()),
                row("Batch", &|i| runs[i].batch.clone()),
                row("Date", &|i| runs[i].timestamp.clone()),
            ],
        }
    }

    pub fn row_labels(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.label.as_str()).collect()
    }

    /// Column widths in characters: name column first, then each value column.
    pub(crate) fn column_widths(&self) -> Vec<usize> {
        let mut widths = Vec::with_capacity(self.headers.len() + 1);
        widths.push(
            self.rows
                .iter()
                .map(|r| r.label.chars().count())
                .chain(std::iter::once(self.name_column.chars().count()))
                .max()
                .unwrap_or(0),
        );
        for (i, header) in self.headers.iter().enumerate() {
            let w = self
                .rows
                .iter()
                .map(|r| {
                    let v = r.values.get(i).map(|v| v.chars().count()).unwrap_or(0);
                    v.max(usize::from(r.width))
                })
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0);
            widths.push(w);
        }
        widths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::run;
    use crate::field::FieldRegistry;
    use crate::section::{analysis_sections, RunSection};

    #[test]
    fn transposes_runs_into_columns() {
        let reg = FieldRegistry::standard();
        let a = run("a", "10.1.1", None, 1.0);
        let b = run("b", "10.2.0", None, 2.0);
        let sections = analysis_sections();
        let spec = &sections[0];

        let set = spec.build_runs(&reg, &[&a, &b]).unwrap();
        let table = Table::transpose(&set).unwrap();

        assert_eq!(table.headers, vec!["Average (a)", "Average (b)"]);
        assert_eq!(table.rows.len(), spec.fields(&reg).len());
        let rss = table.rows.iter().find(|r| r.label == "RSS").unwrap();
        assert_eq!(rss.values, vec!["8000", "16000"]);
    }

    #[test]
    fn rejects_runs_with_different_rows() {
        let reg = FieldRegistry::standard();
        let a = run("a", "10.1.1", None, 1.0);
        let sections = analysis_sections();
        let spec = &sections[0];
        let mut set = spec.build_runs(&reg, &[&a, &a]).unwrap();
        set.columns[1].section.rows.swap(0, 1);
        set.columns[1].tag = "b".into();

        let err = Table::transpose(&set).unwrap_err();
        assert!(err.to_string().contains("run 'b'"), "{}", err);
    }

    #[test]
    fn no_runs_is_empty_run_set() {
        let set = SectionSet {
            spec: analysis_sections().remove(0),
            columns: Vec::<RunSection>::new(),
        };
        assert_eq!(Table::transpose(&set).unwrap_err().kind(), "EmptyRunSet");
    }
}
