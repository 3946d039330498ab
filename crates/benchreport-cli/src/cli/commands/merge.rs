//! CLI command: benchreport merge
//!
//! Folds one distribution table over several runs and prints it as JSON.

use anyhow::Result;
use benchreport_core::{ReportError, RunData};

use super::{load_run, write_file};
use crate::cli::args::{MergeArgs, MergeTable};
use crate::exit_codes;

pub fn run(args: MergeArgs) -> Result<i32> {
    let runs = args
        .inputs
        .iter()
        .map(|p| load_run(p))
        .collect::<Result<Vec<_>>>()?;

    let merged = match merge_table(&runs, args.table) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("merge failed [{}]: {}", e.kind(), e);
            return Ok(exit_codes::REPORT_FAILED);
        }
    };

    let json = serde_json::to_string_pretty(&merged)?;
    match &args.output {
        Some(path) => {
            write_file(path, &json)?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(exit_codes::SUCCESS)
}

fn merge_table(runs: &[RunData], table: MergeTable) -> Result<serde_json::Value, ReportError> {
    let (first, rest) = runs
        .split_first()
        .ok_or_else(|| ReportError::empty_run_set("no runs to merge"))?;

    let value = match table {
        MergeTable::Machperf => {
            let mut acc = first.machperf.clone();
            for run in rest {
                acc = acc.merge(&run.machperf)?;
            }
            serde_json::to_value(acc)?
        }
        MergeTable::Blockprop => {
            let mut acc = first.blockprop.clone();
            for run in rest {
                acc = acc.merge(&run.blockprop)?;
            }
            serde_json::to_value(acc)?
        }
    };
    tracing::info!(runs = runs.len(), table = ?table, "merged runs");
    Ok(value)
}
