//! Output
//!
//! Statistics collection and report files.

pub mod report;
pub mod stats;

pub use report::{read_report, write_report, ReportError, LEDGER_FILE, REPORT_FILE};
pub use stats::{AgentTally, RunMeta, StatsCollector};
