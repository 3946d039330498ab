//! Optional YAML configuration (`benchreport.yaml`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use benchreport_core::{ChartKeys, OutputFormat};
use serde::Deserialize;

pub const DEFAULT_CONFIG: &str = "benchreport.yaml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub author: Option<String>,
    /// Overrides the tool version stamped on reports.
    #[serde(default)]
    pub tool_version: Option<String>,
    #[serde(default)]
    pub formats: Vec<OutputFormat>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Template file per format; relative paths resolve against the config file.
    #[serde(default)]
    pub templates: BTreeMap<OutputFormat, PathBuf>,
    #[serde(default)]
    pub dictionary: Option<PathBuf>,
    #[serde(default)]
    pub charts: ChartsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartsConfig {
    #[serde(default)]
    pub cluster_perf: Option<Vec<String>>,
    #[serde(default)]
    pub block_prop: Option<Vec<String>>,
}

impl Config {
    pub fn parse(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config = Self::parse(&raw)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        if let Some(dir) = path.parent() {
            config.rebase(dir);
        }
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load `explicit`, else `benchreport.yaml` when present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Built-in chart keys with the configured lists swapped in.
    pub fn chart_keys(&self) -> ChartKeys {
        let mut keys = ChartKeys::default();
        if let Some(list) = &self.charts.cluster_perf {
            keys.cluster_perf = list.clone();
        }
        if let Some(list) = &self.charts.block_prop {
            keys.block_prop = list.clone();
        }
        keys
    }

    fn rebase(&mut self, dir: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        };
        self.templates.values_mut().for_each(join);
        if let Some(p) = self.dictionary.as_mut() {
            join(p);
        }
    }
}
