//! Report Output
//!
//! Writes run reports to the output directory.

use isct_events::RunReport;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the report inside the output directory
pub const REPORT_FILE: &str = "report.json";

/// File name of the decision ledger inside the output directory
pub const LEDGER_FILE: &str = "ledger.jsonl";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("report serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write the report as pretty JSON, creating the directory if needed
pub fn write_report(dir: impl AsRef<Path>, report: &RunReport) -> Result<PathBuf, ReportError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(REPORT_FILE);
    fs::write(&path, report.to_json_pretty()?)?;
    Ok(path)
}

/// Read a report written by [`write_report`]
pub fn read_report(path: impl AsRef<Path>) -> Result<RunReport, ReportError> {
    let content = fs::read_to_string(path)?;
    Ok(RunReport::from_json(&content)?)
}
