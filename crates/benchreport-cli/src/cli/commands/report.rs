//! CLI command: benchreport report
//!
//! Usage:
//!   benchreport report --base run.json --compare prev.json [--compare older.json]
//!                      [--format org,latex,text] [--output-dir out] [--emit-context]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use benchreport_core::{
    FieldRegistry, MetricDictionary, OutputFormat, PlaceholderEngine, Rendered, ReportGenerator,
    ReportIdentity, TemplateSet,
};

use super::{load_run, write_file};
use crate::cli::args::ReportArgs;
use crate::config::Config;
use crate::exit_codes;

pub fn run(args: ReportArgs) -> Result<i32> {
    args.validate()?;
    let config = Config::resolve(args.config.as_deref())?;

    let base = load_run(&args.base)?;
    let comparisons = args
        .compare
        .iter()
        .map(|p| load_run(p))
        .collect::<Result<Vec<_>>>()?;

    let formats = if !args.format.is_empty() {
        args.format.clone()
    } else if !config.formats.is_empty() {
        config.formats.clone()
    } else {
        OutputFormat::ALL.to_vec()
    };
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let registry = FieldRegistry::standard();
    let dictionary = match args.dictionary.as_ref().or(config.dictionary.as_ref()) {
        Some(path) => load_dictionary(path)?,
        None => MetricDictionary::from_registry(&registry),
    };
    let templates = load_templates(&args, &config)?;

    let author = args
        .author
        .clone()
        .or_else(|| config.author.clone())
        .unwrap_or_else(|| "unknown".to_string());
    let tool_version = config
        .tool_version
        .clone()
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    let mut identity = ReportIdentity::new(author, tool_version);
    if let Some(date) = args.date {
        identity = identity.at(date);
    }

    let generator = ReportGenerator::new(registry, dictionary, PlaceholderEngine)
        .with_chart_keys(config.chart_keys())
        .with_templates(templates);

    let rendered = match generator.generate(&identity, &base, &comparisons, &formats) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("report failed [{}]: {}", e.kind(), e);
            return Ok(exit_codes::REPORT_FAILED);
        }
    };

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output dir: {}", output_dir.display()))?;
    let staging = tempfile::Builder::new()
        .prefix(".benchreport-")
        .tempdir_in(&output_dir)
        .with_context(|| format!("Failed to create staging dir in {}", output_dir.display()))?;

    let mut staged = Vec::new();
    for out in &rendered {
        staged.extend(stage_rendered(staging.path(), out, args.emit_context)?);
    }
    publish(staging.path(), &output_dir, &staged)?;

    for out in &rendered {
        eprintln!("wrote {}", output_dir.join(&out.filename).display());
    }
    Ok(exit_codes::SUCCESS)
}

fn load_dictionary(path: &Path) -> Result<MetricDictionary> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dictionary: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse dictionary: {}", path.display()))
}

/// Built-in templates, then the config's files, then `--template` flags.
fn load_templates(args: &ReportArgs, config: &Config) -> Result<TemplateSet> {
    let overrides = config
        .templates
        .iter()
        .map(|(f, p)| (*f, p.clone()))
        .chain(args.template_overrides()?);

    let mut set = TemplateSet::default();
    for (format, path) in overrides {
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {} template: {}", format, path.display()))?;
        set = set.with_source(format, source);
    }
    Ok(set)
}

/// Write one format's files into `dir`, returning their names.
fn stage_rendered(dir: &Path, out: &Rendered, emit_context: bool) -> Result<Vec<String>> {
    let mut files = vec![(out.filename.clone(), out.text.as_str())];
    files.extend(
        out.tables
            .iter()
            .map(|t| (t.filename.clone(), t.text.as_str())),
    );
    if emit_context {
        files.push((format!("{}.context.json", out.filename), out.context_json.as_str()));
        files.push((format!("{}.template", out.filename), out.template_source.as_str()));
    }

    for (name, text) in &files {
        write_file(&dir.join(name), text)?;
    }
    Ok(files.into_iter().map(|(name, _)| name).collect())
}

/// Move staged files into `dir`. If any move fails, the files already moved
/// by this call are removed again.
fn publish(staging: &Path, dir: &Path, names: &[String]) -> Result<()> {
    let mut moved = Vec::with_capacity(names.len());
    for name in names {
        let target = dir.join(name);
        if let Err(err) = std::fs::rename(staging.join(name), &target) {
            for path in &moved {
                let _ = std::fs::remove_file(path);
            }
            return Err(err)
                .with_context(|| format!("Failed to write output: {}", target.display()));
        }
        moved.push(target);
    }
    tracing::debug!(files = moved.len(), dir = %dir.display(), "published report files");
    Ok(())
}
