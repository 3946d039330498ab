use std::path::Path;

use anyhow::{Context, Result};
use benchreport_core::RunData;

mod dispatch;
pub mod merge;
pub mod report;

pub use dispatch::dispatch;

/// Read and validate one run file.
pub(crate) fn load_run(path: &Path) -> Result<RunData> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read run: {}", path.display()))?;
    let run: RunData = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse run: {}", path.display()))?;
    tracing::debug!(tag = %run.tag(), path = %path.display(), "loaded run");
    Ok(run)
}

pub(crate) fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write output: {}", path.display()))
}
