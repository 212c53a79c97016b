//! Simulation Runner
//!
//! Owns one run: the population, the seeded RNG, the statistics collector
//! and the decision ledger. Rounds run to completion in order.

use isct_events::{generate_record_id, NegotiationRecord, RunReport};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::components::population::Population;
use crate::config::Config;
use crate::error::NegotiationError;
use crate::events::ledger::{DecisionLedger, LedgerError};
use crate::output::stats::{RunMeta, StatsCollector};
use crate::setup::agents::spawn_agents;
use crate::setup::scenarios::find_scenario;
use crate::systems::negotiation::NegotiationEngine;
use crate::systems::pairing::{schedule_round, Pairing};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("run already completed its {rounds} rounds")]
    Finished { rounds: u32 },
}

/// What happened in one round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub round: u32,
    /// Mean score of the round's negotiations
    pub score: Option<f32>,
    pub negotiations: usize,
    pub explanations: Vec<String>,
}

/// Hook called after every round
pub trait RoundObserver {
    fn on_round(&mut self, summary: &RoundSummary);
}

impl<F: FnMut(&RoundSummary)> RoundObserver for F {
    fn on_round(&mut self, summary: &RoundSummary) {
        self(summary)
    }
}

/// One simulation run
pub struct Simulation {
    engine: NegotiationEngine,
    population: Population,
    rng: SmallRng,
    pairing: Pairing,
    rounds: u32,
    current_round: u32,
    meta: RunMeta,
    stats: StatsCollector,
    ledger: DecisionLedger,
    next_record: u64,
}

impl Simulation {
    /// Spawn the configured scenario's agents from the seed and prepare a run
    pub fn from_config(config: &Config) -> Result<Self, SimulationError> {
        config.validate()?;
        let preset = find_scenario(&config.simulation.scenario)?;
        let mut rng = SmallRng::seed_from_u64(config.simulation.seed);
        let agents = spawn_agents(config.simulation.agent_count, preset, &mut rng);
        let population = Population::from_agents(agents, config.validation.strict)?;
        Self::build(config, population, rng)
    }

    /// Prepare a run over a caller-supplied population
    pub fn with_population(config: &Config, population: Population) -> Result<Self, SimulationError> {
        config.validate()?;
        let rng = SmallRng::seed_from_u64(config.simulation.seed);
        Self::build(config, population, rng)
    }

    fn build(config: &Config, population: Population, rng: SmallRng) -> Result<Self, SimulationError> {
        population.ensure_pairable()?;
        let engine = config.engine();

        Ok(Self {
            meta: RunMeta {
                seed: config.simulation.seed,
                scenario: config.simulation.scenario.clone(),
                strategy: engine.strategy().to_string(),
            },
            stats: StatsCollector::new(&population),
            engine,
            population,
            rng,
            pairing: config.simulation.pairing,
            rounds: config.simulation.rounds,
            current_round: 0,
            ledger: DecisionLedger::null(),
            next_record: 0,
        })
    }

    /// Write every negotiation to this ledger
    pub fn with_ledger(mut self, ledger: DecisionLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn ledger(&self) -> &DecisionLedger {
        &self.ledger
    }

    pub fn is_finished(&self) -> bool {
        self.current_round >= self.rounds
    }

    /// Run the next round. Fails once every configured round has run.
    pub fn step(&mut self) -> Result<RoundSummary, SimulationError> {
        if self.is_finished() {
            return Err(SimulationError::Finished { rounds: self.rounds });
        }
        self.current_round += 1;
        let round = self.current_round;
        let strategy = self.engine.strategy().to_string();
        let pairs = schedule_round(self.pairing, self.population.len(), &mut self.rng);
        let mut explanations = Vec::with_capacity(pairs.len());

        for (first, second) in pairs {
            let (a, b) = self.population.pair_mut(first, second)?;
            let outcome = self.engine.score(a, b)?;
            let explanation = self.engine.explain(&outcome, a, b);
            self.engine.apply(&outcome, a, b, round, &mut self.rng);

            self.next_record += 1;
            let record = NegotiationRecord {
                record_id: generate_record_id(self.next_record),
                round,
                agent_a: a.id.0.clone(),
                agent_b: b.id.0.clone(),
                strategy: strategy.clone(),
                score: outcome.value(),
                verdict: outcome.verdict(),
                explanation: explanation.clone(),
            };
            tracing::debug!(round, record = %record.record_id, "{}", explanation);

            self.stats.record(&record);
            self.ledger.append(record)?;
            explanations.push(explanation);
        }

        let point = self.stats.end_round(round, &self.population);
        Ok(RoundSummary {
            round,
            score: point.map(|p| p.score),
            negotiations: explanations.len(),
            explanations,
        })
    }

    /// Run every remaining round and build the report
    pub fn run(self) -> Result<RunReport, SimulationError> {
        self.run_with_observer(&mut |_: &RoundSummary| {})
    }

    /// Run every remaining round, calling the observer after each
    pub fn run_with_observer(
        mut self,
        observer: &mut dyn RoundObserver,
    ) -> Result<RunReport, SimulationError> {
        tracing::info!(
            seed = self.meta.seed,
            scenario = %self.meta.scenario,
            strategy = %self.meta.strategy,
            agents = self.population.len(),
            rounds = self.rounds,
            "starting run"
        );

        while !self.is_finished() {
            let summary = self.step()?;
            observer.on_round(&summary);
        }

        self.finish()
    }

    /// Flush the ledger and build the report from what has run so far
    pub fn finish(mut self) -> Result<RunReport, SimulationError> {
        self.ledger.flush().map_err(LedgerError::from)?;
        tracing::info!(
            rounds = self.current_round,
            negotiations = self.ledger.entry_count(),
            ledger_head = %self.ledger.head(),
            "run complete"
        );

        let stats = std::mem::take(&mut self.stats);
        let meta = self.meta.clone();
        Ok(stats.finish(meta, &self.population))
    }
}
