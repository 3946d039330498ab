//! Built-in report templates and per-format overrides.

use std::collections::BTreeMap;

use super::OutputFormat;

pub const DEFAULT_ORG: &str = r#"#+TITLE: {{ report.title }}
#+AUTHOR: {{ report.author }}
#+DATE: {{ report.date }}
#+SUBTITLE: {{ report.tag }}

* Overview

Performance of {{ base.name }} {{ report.target }} under the
{{ base.workload_title }} workload, compared with earlier releases.

{{ tables.manifest }}
{{ tables.summary }}
* Analysis

{{ tables_all }}
Generated by benchreport {{ report.tool_version }}.
"#;

pub const DEFAULT_LATEX: &str = r#"\documentclass{article}
\usepackage[margin=2cm]{geometry}
\title{ {{ report.title }} }
\author{ {{ report.author }} }
\date{ {{ report.date }} }

\begin{document}
\maketitle

\section{Overview}

Performance of {{ base.name }} {{ report.target }} under the
{{ base.workload_title }} workload (report {{ report.tag }}).

{{ tables.manifest }}
{{ tables.summary }}
\section{Analysis}

{{ tables_all }}
\bigskip
\noindent Generated by benchreport {{ report.tool_version }}.

\end{document}
"#;

pub const DEFAULT_TEXT: &str = r#"{{ report.title }}
by {{ report.author }}, {{ report.date }}
{{ report.tag }}

{{ tables.manifest }}
{{ tables.summary }}
{{ tables_all }}
benchreport {{ report.tool_version }}
"#;

/// Template source for each output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    sources: BTreeMap<OutputFormat, String>,
}

impl Default for TemplateSet {
    fn default() -> Self {
        let sources = OutputFormat::ALL
            .iter()
            .map(|f| (*f, default_source(*f).to_string()))
            .collect();
        Self { sources }
    }
}

impl TemplateSet {
    /// Replace the template used for `format`.
    pub fn with_source(mut self, format: OutputFormat, source: impl Into<String>) -> Self {
        self.sources.insert(format, source.into());
        self
    }

    pub fn get(&self, format: OutputFormat) -> &str {
        self.sources
            .get(&format)
            .map(String::as_str)
            .unwrap_or_else(|| default_source(format))
    }
}

pub fn default_source(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Org => DEFAULT_ORG,
        OutputFormat::Latex => DEFAULT_LATEX,
        OutputFormat::Text => DEFAULT_TEXT,
    }
}
