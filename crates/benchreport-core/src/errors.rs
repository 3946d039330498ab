//! Error types for report generation.
//!
//! Every variant is a hard abort of the current report-generation call:
//! nothing is retried and no partial report is produced.

use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Two CDFs were merged whose percentile grids differ.
    #[error("incompatible distributions{}: probability grid {left:?} vs {right:?}", metric_suffix(.metric))]
    IncompatibleDistributions {
        metric: Option<String>,
        left: Vec<f64>,
        right: Vec<f64>,
    },

    /// A CDF was constructed that breaks the distribution invariants.
    #[error("invalid distribution: {reason}")]
    InvalidDistribution { reason: String },

    #[error("invalid precision {precision}: must be >= 0")]
    InvalidPrecision { precision: i32 },

    /// A field name is absent from the registry, or a table cannot resolve it.
    #[error("unknown field '{name}'{}", context_suffix(.context))]
    UnknownField {
        name: String,
        context: Option<String>,
    },

    /// Two registry fields share a name.
    #[error("duplicate field '{name}' in registry")]
    DuplicateField { name: String },

    /// Two sections would write the same table or file, or shadow the run manifest.
    #[error("section {what} '{name}' collides with {other}")]
    SectionCollision {
        what: &'static str,
        name: String,
        other: String,
    },

    #[error("empty run set: {context}")]
    EmptyRunSet { context: String },

    /// A key referenced by the report is missing from the metric dictionary.
    #[error("missing metric definition for '{key}' (referenced by {referenced_by})")]
    MissingMetricDefinition { key: String, referenced_by: String },

    /// Reported verbatim from the template engine.
    #[error("template error ({format}): {message}")]
    TemplateError { format: String, message: String },

    #[error("context serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn metric_suffix(metric: &Option<String>) -> String {
    metric
        .as_ref()
        .map(|m| format!(" for '{}'", m))
        .unwrap_or_default()
}

fn context_suffix(context: &Option<String>) -> String {
    context
        .as_ref()
        .map(|c| format!(" in {}", c))
        .unwrap_or_default()
}

impl ReportError {
    pub fn unknown_field_in(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnknownField {
            name: name.into(),
            context: Some(context.into()),
        }
    }

    pub fn invalid_distribution(reason: impl Into<String>) -> Self {
        Self::InvalidDistribution {
            reason: reason.into(),
        }
    }

    pub fn empty_run_set(context: impl Into<String>) -> Self {
        Self::EmptyRunSet {
            context: context.into(),
        }
    }

    pub fn template(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TemplateError {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable kind, used by the CLI for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IncompatibleDistributions { .. } => "IncompatibleDistributions",
            Self::InvalidDistribution { .. } => "InvalidDistribution",
            Self::InvalidPrecision { .. } => "InvalidPrecision",
            Self::UnknownField { .. } => "UnknownField",
            Self::DuplicateField { .. } => "DuplicateField",
            Self::SectionCollision { .. } => "SectionCollision",
            Self::EmptyRunSet { .. } => "EmptyRunSet",
            Self::MissingMetricDefinition { .. } => "MissingMetricDefinition",
            Self::TemplateError { .. } => "TemplateError",
            Self::Serialization(_) => "Serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_field_message_carries_context() {
        let err = ReportError::unknown_field_in("cdfRss", "MachPerf");
        assert_eq!(err.to_string(), "unknown field 'cdfRss' in MachPerf");
        assert_eq!(err.kind(), "UnknownField");

        let bare = ReportError::UnknownField {
            name: "cdfRss".to_string(),
            context: None,
        };
        assert_eq!(bare.to_string(), "unknown field 'cdfRss'");
    }

    #[test]
    fn template_error_is_verbatim() {
        let err = ReportError::template("org", "unterminated tag at byte 12");
        assert_eq!(
            err.to_string(),
            "template error (org): unterminated tag at byte 12"
        );
    }
}
