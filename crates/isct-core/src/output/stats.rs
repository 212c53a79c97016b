//! Statistics Output
//!
//! Collects per-round series, the ethical state heatmap, and per-agent tallies
//! during a run, then folds them into a report.

use isct_events::{
    generate_report_id, LeaderboardEntry, NegotiationRecord, RoundPoint, RunReport, TrustBar,
};
use std::collections::HashMap;

use crate::components::population::Population;

/// Running totals for one agent
#[derive(Debug, Clone, Default)]
pub struct AgentTally {
    pub negotiations: u32,
    pub verdicts: u32,
    pub accepted: u32,
}

/// Identity of a run, stamped onto its report
#[derive(Debug, Clone)]
pub struct RunMeta {
    pub seed: u64,
    pub scenario: String,
    pub strategy: String,
}

/// Accumulates statistics during a simulation
#[derive(Debug, Clone, Default)]
pub struct StatsCollector {
    agent_ids: Vec<String>,
    initial_states: Vec<f32>,
    series: Vec<RoundPoint>,
    heatmap: Vec<Vec<f32>>,
    status_log: Vec<String>,
    round_scores: Vec<f32>,
    tallies: HashMap<String, AgentTally>,
}

impl StatsCollector {
    /// Start collecting for a population in its initial state
    pub fn new(population: &Population) -> Self {
        Self {
            agent_ids: population.iter().map(|a| a.id.0.clone()).collect(),
            initial_states: population.ethical_states(),
            ..Self::default()
        }
    }

    /// Record one negotiation of the current round
    pub fn record(&mut self, record: &NegotiationRecord) {
        self.round_scores.push(record.score);
        self.status_log
            .push(format!("[round {}] {}", record.round, record.explanation));

        for agent_id in [&record.agent_a, &record.agent_b] {
            let tally = self.tallies.entry(agent_id.clone()).or_default();
            tally.negotiations += 1;
            if let Some(verdict) = record.verdict {
                tally.verdicts += 1;
                if verdict.is_accepted() {
                    tally.accepted += 1;
                }
            }
        }
    }

    /// Close a round: aggregate its scores and snapshot every ethical state.
    /// Returns `None` when the round held no negotiation.
    pub fn end_round(&mut self, round: u32, population: &Population) -> Option<RoundPoint> {
        self.heatmap.push(population.ethical_states());

        let scores = std::mem::take(&mut self.round_scores);
        if scores.is_empty() {
            return None;
        }
        let point = RoundPoint {
            round,
            score: scores.iter().sum::<f32>() / scores.len() as f32,
        };
        self.series.push(point);
        Some(point)
    }

    pub fn series(&self) -> &[RoundPoint] {
        &self.series
    }

    /// Rank agents by mean agreement score, best first; ties by name
    pub fn leaderboard(&self, population: &Population) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = population
            .iter()
            .enumerate()
            .map(|(slot, agent)| {
                let tally = self.tallies.get(agent.id.as_str()).cloned().unwrap_or_default();
                let initial = self.initial_states.get(slot).copied().unwrap_or(agent.ethical_state);
                LeaderboardEntry {
                    rank: 0,
                    agent_id: agent.id.0.clone(),
                    name: agent.name.clone(),
                    mean_score: agent.mean_score().unwrap_or(0.0),
                    negotiations: tally.negotiations,
                    drift: agent.ethical_state - initial,
                    acceptance_rate: (tally.verdicts > 0)
                        .then(|| tally.accepted as f32 / tally.verdicts as f32),
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            b.mean_score
                .total_cmp(&a.mean_score)
                .then_with(|| a.name.cmp(&b.name))
        });
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i as u32 + 1;
        }
        entries
    }

    /// Fold everything collected into a report
    pub fn finish(self, meta: RunMeta, population: &Population) -> RunReport {
        let leaderboard = self.leaderboard(population);
        let trust_bars = population
            .iter()
            .map(|agent| TrustBar {
                agent_id: agent.id.0.clone(),
                name: agent.name.clone(),
                trust: agent.ethical_state,
            })
            .collect();

        RunReport {
            report_id: generate_report_id(meta.seed),
            seed: meta.seed,
            scenario: meta.scenario,
            strategy: meta.strategy,
            rounds: self.heatmap.len() as u32,
            series: self.series,
            agent_ids: self.agent_ids,
            heatmap: self.heatmap,
            trust_bars,
            leaderboard,
            status_log: self.status_log,
        }
    }
}
