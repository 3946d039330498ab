use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use benchreport_core::OutputFormat;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "benchreport",
    version,
    about = "Comparative performance reports for cluster benchmark runs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a report comparing a base run against earlier runs
    Report(ReportArgs),
    /// Merge the distributions of several runs into one table
    Merge(MergeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Run file (JSON) of the run under test
    #[arg(long)]
    pub base: PathBuf,

    /// Run file (JSON) to compare against; repeat in report column order
    #[arg(long = "compare", value_name = "RUN")]
    pub compare: Vec<PathBuf>,

    /// Output formats: org, latex, text (default: all, or the config's list)
    #[arg(short, long, value_delimiter = ',')]
    pub format: Vec<OutputFormat>,

    /// Directory receiving the report and table files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Config file (default: benchreport.yaml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Report author
    #[arg(long, env = "BENCHREPORT_AUTHOR")]
    pub author: Option<String>,

    /// Report date (RFC 3339); defaults to now
    #[arg(long)]
    pub date: Option<DateTime<Utc>>,

    /// Metric dictionary (JSON); defaults to one derived from the field registry
    #[arg(long)]
    pub dictionary: Option<PathBuf>,

    /// Template override as FORMAT=PATH
    #[arg(long = "template", value_name = "FORMAT=PATH")]
    pub templates: Vec<String>,

    /// Also write the template source and the render context next to each report
    #[arg(long)]
    pub emit_context: bool,
}

impl ReportArgs {
    pub fn validate(&self) -> Result<()> {
        self.template_overrides()?;
        Ok(())
    }

    pub fn template_overrides(&self) -> Result<Vec<(OutputFormat, PathBuf)>> {
        self.templates
            .iter()
            .map(|raw| {
                let Some((format, path)) = raw.split_once('=') else {
                    bail!("--template expects FORMAT=PATH, got '{}'", raw);
                };
                if path.is_empty() {
                    bail!("--template '{}' has an empty path", raw);
                }
                let format = format
                    .parse::<OutputFormat>()
                    .map_err(anyhow::Error::msg)
                    .with_context(|| format!("in --template '{}'", raw))?;
                Ok((format, PathBuf::from(path)))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MergeTable {
    Machperf,
    Blockprop,
}

#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    /// Run files (JSON) to merge
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Which distribution table to merge
    #[arg(long, value_enum, default_value = "machperf")]
    pub table: MergeTable,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ReportArgs {
        let cli = Cli::try_parse_from(std::iter::once("benchreport").chain(args.iter().copied()))
            .unwrap();
        match cli.cmd {
            Command::Report(args) => args,
            Command::Merge(_) => panic!("expected report"),
        }
    }

    #[test]
    fn parses_repeated_compare_and_format_list() {
        let args = parse(&[
            "report", "--base", "a.json", "--compare", "b.json", "--compare", "c.json",
            "--format", "org,tex",
        ]);
        assert_eq!(args.compare, vec![PathBuf::from("b.json"), PathBuf::from("c.json")]);
        assert_eq!(args.format, vec![OutputFormat::Org, OutputFormat::Latex]);
    }

    #[test]
    fn template_overrides_need_format_and_path() {
        let args = parse(&["report", "--base", "a.json", "--template", "text=t.txt"]);
        assert_eq!(
            args.template_overrides().unwrap(),
            vec![(OutputFormat::Text, PathBuf::from("t.txt"))]
        );

        let args = parse(&["report", "--base", "a.json", "--template", "t.txt"]);
        assert!(args.validate().is_err());

        let args = parse(&["report", "--base", "a.json", "--template", "html=t.html"]);
        let err = format!("{:#}", args.validate().unwrap_err());
        assert!(err.contains("unknown output format 'html'"), "{}", err);
    }

    #[test]
    fn rejects_unknown_format() {
        let res = Cli::try_parse_from(["benchreport", "report", "--base", "a", "--format", "pdf"]);
        assert!(res.is_err());
    }
}
