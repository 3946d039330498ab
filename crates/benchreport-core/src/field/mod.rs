//! Named, typed, documented metric fields and the registry that catalogs them.

mod catalog;
mod registry;

pub use registry::FieldRegistry;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cdf::Stat;

/// The metric table a field is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Per-run instant values.
    Summary,
    /// Per-machine resource and forging distributions.
    MachPerf,
    /// Block propagation distributions.
    BlockProp,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Summary => "Summary",
            Category::MachPerf => "MachPerf",
            Category::BlockProp => "BlockProp",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report section a field is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    Run,
    Resource,
    Forging,
    PeerPropagation,
    EndToEnd,
}

/// Attributes shared by both field flavors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub short_label: String,
    pub description: String,
    pub unit: String,
    pub precision: u8,
    pub width: u16,
    pub group: FieldGroup,
    pub applies_to: Vec<Category>,
}

impl FieldSpec {
    pub fn new(
        name: impl Into<String>,
        short_label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            short_label: short_label.into(),
            description: description.into(),
            unit: String::new(),
            precision: 0,
            width: 6,
            group: FieldGroup::Run,
            applies_to: Vec::new(),
        }
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn group(mut self, group: FieldGroup) -> Self {
        self.group = group;
        self
    }

    pub fn applies_to(mut self, categories: &[Category]) -> Self {
        self.applies_to = categories.to_vec();
        self
    }

    pub fn instant(self) -> Field {
        Field::Instant(self)
    }

    pub fn distributional(self) -> Field {
        Field::Distributional {
            spec: self,
            stat: Stat::Centrality,
        }
    }
}

/// A metric field: valued per run (instant) or as a distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Field {
    Instant(FieldSpec),
    Distributional {
        #[serde(flatten)]
        spec: FieldSpec,
        /// Statistic rendered in section tables.
        stat: Stat,
    },
}

impl Field {
    pub fn spec(&self) -> &FieldSpec {
        match self {
            Field::Instant(spec) => spec,
            Field::Distributional { spec, .. } => spec,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec().name
    }

    pub fn short_label(&self) -> &str {
        &self.spec().short_label
    }

    pub fn description(&self) -> &str {
        &self.spec().description
    }

    pub fn precision(&self) -> u8 {
        self.spec().precision
    }

    pub fn width(&self) -> u16 {
        self.spec().width
    }

    pub fn group(&self) -> FieldGroup {
        self.spec().group
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Field::Instant(_) => "instant",
            Field::Distributional { .. } => "distributional",
        }
    }

    pub fn is_distributional(&self) -> bool {
        matches!(self, Field::Distributional { .. })
    }

    pub fn applies_to(&self, category: Category) -> bool {
        self.spec().applies_to.contains(&category)
    }

    /// Render a different statistic for a distributional field.
    pub fn with_stat(self, stat: Stat) -> Field {
        match self {
            Field::Distributional { spec, .. } => Field::Distributional { spec, stat },
            instant => instant,
        }
    }
}

/// Predicate choosing which fields a section shows.
#[derive(Clone)]
pub struct FieldSelector {
    describe: String,
    pred: Arc<dyn Fn(&Field) -> bool + Send + Sync>,
}

impl FieldSelector {
    pub fn new(
        describe: impl Into<String>,
        pred: impl Fn(&Field) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            describe: describe.into(),
            pred: Arc::new(pred),
        }
    }

    pub fn all() -> Self {
        Self::new("all", |_| true)
    }

    pub fn none() -> Self {
        Self::new("none", |_| false)
    }

    pub fn group(group: FieldGroup) -> Self {
        Self::new(format!("group:{:?}", group), move |f| f.group() == group)
    }

    pub fn names(names: &[&str]) -> Self {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        Self::new(format!("names:{}", names.join(",")), move |f| {
            names.iter().any(|n| n == f.name())
        })
    }

    pub fn matches(&self, field: &Field) -> bool {
        (self.pred)(field)
    }
}

impl fmt::Debug for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldSelector").field(&self.describe).finish()
    }
}
