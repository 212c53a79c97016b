//! Configuration System
//!
//! Loads run parameters from a TOML file. Every table is optional; missing
//! values fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::error::NegotiationError;
use crate::setup::scenarios::{find_scenario, DEFAULT_SCENARIO};
use crate::systems::drift::DriftRules;
use crate::systems::negotiation::{
    negotiation_constants, NegotiationEngine, NegotiationRules, NegotiationStrategy, Personality,
    ScoreRange,
};
use crate::systems::pairing::Pairing;

/// Default config file path
pub const DEFAULT_CONFIG_PATH: &str = "isct.toml";

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub negotiation: NegotiationConfig,
    #[serde(default)]
    pub drift: DriftConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Run length, population and schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub rounds: u32,
    pub agent_count: usize,
    pub scenario: String,
    pub pairing: Pairing,
    /// Delay between rounds, display pacing only
    pub pacing_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            rounds: 20,
            agent_count: 5,
            scenario: DEFAULT_SCENARIO.to_string(),
            pairing: Pairing::RandomPair,
            pacing_ms: 0,
        }
    }
}

/// Strategy name as written in config files and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    SimpleAverage,
    Personality,
    MultiAttributeWeighted,
    StrictThreshold,
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple_average" => Ok(StrategyKind::SimpleAverage),
            "personality" => Ok(StrategyKind::Personality),
            "multi_attribute_weighted" => Ok(StrategyKind::MultiAttributeWeighted),
            "strict_threshold" => Ok(StrategyKind::StrictThreshold),
            other => Err(format!(
                "unknown strategy '{}' (expected simple_average, personality, \
                 multi_attribute_weighted or strict_threshold)",
                other
            )),
        }
    }
}

/// Scoring strategy and thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationConfig {
    pub strategy: StrategyKind,
    /// Only read by the personality strategy
    pub personality: Personality,
    pub agreement_threshold: f32,
    pub violation_threshold: f32,
    pub score_range: ScoreRange,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::SimpleAverage,
            personality: Personality::Balanced,
            agreement_threshold: negotiation_constants::AGREEMENT_THRESHOLD,
            violation_threshold: negotiation_constants::VIOLATION_THRESHOLD,
            score_range: ScoreRange::Raw,
        }
    }
}

impl NegotiationConfig {
    pub fn strategy(&self) -> NegotiationStrategy {
        match self.strategy {
            StrategyKind::SimpleAverage => NegotiationStrategy::SimpleAverage,
            StrategyKind::Personality => NegotiationStrategy::Personality(self.personality),
            StrategyKind::MultiAttributeWeighted => NegotiationStrategy::MultiAttributeWeighted,
            StrategyKind::StrictThreshold => NegotiationStrategy::StrictThreshold,
        }
    }

    pub fn rules(&self) -> NegotiationRules {
        NegotiationRules {
            agreement_threshold: self.agreement_threshold,
            violation_threshold: self.violation_threshold,
            score_range: self.score_range,
        }
    }
}

/// Post-negotiation drift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    pub smoothing: f32,
    pub min: f32,
    pub max: f32,
    pub clamp: bool,
}

impl Default for DriftConfig {
    fn default() -> Self {
        let rules = DriftRules::default();
        Self {
            smoothing: rules.smoothing,
            min: rules.perturbation_min,
            max: rules.perturbation_max,
            clamp: rules.clamp,
        }
    }
}

impl DriftConfig {
    pub fn rules(&self) -> DriftRules {
        DriftRules {
            smoothing: self.smoothing,
            perturbation_min: self.min,
            perturbation_max: self.max,
            clamp: self.clamp,
        }
    }
}

/// Admission checks for agent values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject values outside 0.0 to 1.0 instead of admitting them with a warning
    pub strict: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// Where run artifacts go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub write_report: bool,
    pub write_ledger: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            write_report: true,
            write_ledger: true,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] NegotiationError),
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default path, or use defaults if not found
    pub fn load_or_default() -> Self {
        Self::from_file(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", DEFAULT_CONFIG_PATH, e);
            Self::default()
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), NegotiationError> {
        find_scenario(&self.simulation.scenario)?;
        for (name, value) in [
            ("agreement_threshold", self.negotiation.agreement_threshold),
            ("violation_threshold", self.negotiation.violation_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(NegotiationError::invalid(format!(
                    "{} {} must be a non-negative number",
                    name, value
                )));
            }
        }
        self.drift.rules().validate()
    }

    /// Engine configured for this run
    pub fn engine(&self) -> NegotiationEngine {
        NegotiationEngine::new(self.negotiation.strategy())
            .with_rules(self.negotiation.rules())
            .with_drift(self.drift.rules())
    }
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# ISCT negotiation simulator configuration

[simulation]
seed = 42
rounds = 20
agent_count = 5
# balanced_market | privacy_standoff | cultural_divide | regulated_consortium
scenario = "balanced_market"
# random_pair | all_pairs
pairing = "random_pair"
pacing_ms = 0

[negotiation]
# simple_average | personality | multi_attribute_weighted | strict_threshold
strategy = "simple_average"
# balanced | aggressive | cooperative
personality = "balanced"
agreement_threshold = 0.2
violation_threshold = 0.5
# raw | clamped
score_range = "raw"

[drift]
smoothing = 0.5
min = -0.05
max = 0.10
clamp = true

[validation]
strict = true

[output]
directory = "output"
write_report = true
write_ledger = true
"#
    .to_string()
}
