//! Run Report Types
//!
//! Serialization structs for the output of a simulation run.
//!
//! A report carries everything a presentation layer needs to plot a run: the
//! aggregate score series, the per-agent ethical state heatmap, final trust
//! bars, a leaderboard, and the explanation log.

use serde::{Deserialize, Serialize};

/// Generates a report ID from the run seed.
pub fn generate_report_id(seed: u64) -> String {
    format!("run_{:016x}", seed)
}

/// Aggregate score for one round (line chart point)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundPoint {
    pub round: u32,
    pub score: f32,
}

/// Final trust of one agent (bar chart bar)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustBar {
    pub agent_id: String,
    pub name: String,
    pub trust: f32,
}

/// Ranking of one agent by mean agreement score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub agent_id: String,
    pub name: String,
    pub mean_score: f32,
    pub negotiations: u32,
    /// Final ethical state minus initial ethical state
    pub drift: f32,
    /// Share of accepted verdicts, only present for strict runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_rate: Option<f32>,
}

/// Complete output of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub report_id: String,
    pub seed: u64,
    pub scenario: String,
    pub strategy: String,
    pub rounds: u32,
    pub series: Vec<RoundPoint>,
    /// Heatmap columns, in population order
    pub agent_ids: Vec<String>,
    /// One row per round, one column per agent
    pub heatmap: Vec<Vec<f32>>,
    pub trust_bars: Vec<TrustBar>,
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub status_log: Vec<String>,
}

impl RunReport {
    /// Mean of the aggregate score series
    pub fn mean_score(&self) -> Option<f32> {
        if self.series.is_empty() {
            return None;
        }
        Some(self.series.iter().map(|p| p.score).sum::<f32>() / self.series.len() as f32)
    }

    /// Ethical state trajectory of one agent across rounds.
    /// `None` for an unknown agent or a heatmap row missing its column.
    pub fn trajectory(&self, agent_id: &str) -> Option<Vec<f32>> {
        let column = self.agent_ids.iter().position(|id| id == agent_id)?;
        self.heatmap
            .iter()
            .map(|row| row.get(column).copied())
            .collect()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}
