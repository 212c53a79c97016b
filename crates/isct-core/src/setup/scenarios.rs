//! Scenario Library
//!
//! Named presets that set the sampling ranges for a run's agents.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::error::NegotiationError;

/// Inclusive uniform sampling range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRange {
    pub min: f32,
    pub max: f32,
}

impl SampleRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    pub fn sample(&self, rng: &mut SmallRng) -> f32 {
        if self.min < self.max {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

/// An ethical dilemma expressed as agent sampling ranges
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioPreset {
    pub name: &'static str,
    pub description: &'static str,
    pub ethical_state: SampleRange,
    pub microsocial_weight: SampleRange,
    pub data_sharing: SampleRange,
    pub regulation: SampleRange,
    pub profit_focus: SampleRange,
    pub governance: SampleRange,
    pub hypernorm_weight: SampleRange,
    pub microsocial_contract: SampleRange,
}

pub const DEFAULT_SCENARIO: &str = "balanced_market";

pub const SCENARIOS: &[ScenarioPreset] = &[
    ScenarioPreset {
        name: "balanced_market",
        description: "Unconstrained firms with uniformly random postures",
        ethical_state: SampleRange::unit(),
        microsocial_weight: SampleRange::new(0.5, 1.0),
        data_sharing: SampleRange::unit(),
        regulation: SampleRange::unit(),
        profit_focus: SampleRange::unit(),
        governance: SampleRange::unit(),
        hypernorm_weight: SampleRange::new(0.5, 1.0),
        microsocial_contract: SampleRange::unit(),
    },
    ScenarioPreset {
        name: "privacy_standoff",
        description: "Data brokers and regulators disagree on how much to share",
        ethical_state: SampleRange::new(0.2, 0.9),
        microsocial_weight: SampleRange::new(0.4, 1.0),
        data_sharing: SampleRange::unit(),
        regulation: SampleRange::new(0.6, 1.0),
        profit_focus: SampleRange::new(0.3, 0.9),
        governance: SampleRange::new(0.4, 0.9),
        hypernorm_weight: SampleRange::new(0.6, 1.0),
        microsocial_contract: SampleRange::new(0.1, 0.9),
    },
    ScenarioPreset {
        name: "cultural_divide",
        description: "Firms from communities with very different local norms",
        ethical_state: SampleRange::unit(),
        microsocial_weight: SampleRange::new(0.3, 1.0),
        data_sharing: SampleRange::new(0.2, 0.8),
        regulation: SampleRange::new(0.2, 0.8),
        profit_focus: SampleRange::new(0.2, 0.8),
        governance: SampleRange::new(0.3, 0.8),
        hypernorm_weight: SampleRange::new(0.3, 1.0),
        microsocial_contract: SampleRange::unit(),
    },
    ScenarioPreset {
        name: "regulated_consortium",
        description: "Members of an industry body with shared codes of conduct",
        ethical_state: SampleRange::new(0.5, 0.8),
        microsocial_weight: SampleRange::new(0.7, 1.0),
        data_sharing: SampleRange::new(0.3, 0.6),
        regulation: SampleRange::new(0.7, 1.0),
        profit_focus: SampleRange::new(0.3, 0.6),
        governance: SampleRange::new(0.7, 1.0),
        hypernorm_weight: SampleRange::new(0.8, 1.0),
        microsocial_contract: SampleRange::new(0.4, 0.7),
    },
];

/// Look up a preset by name
pub fn find_scenario(name: &str) -> Result<&'static ScenarioPreset, NegotiationError> {
    SCENARIOS.iter().find(|s| s.name == name).ok_or_else(|| {
        NegotiationError::invalid(format!(
            "unknown scenario '{}' (known: {})",
            name,
            scenario_names().join(", ")
        ))
    })
}

pub fn scenario_names() -> Vec<&'static str> {
    SCENARIOS.iter().map(|s| s.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_find_scenario() {
        assert_eq!(find_scenario("privacy_standoff").unwrap().name, "privacy_standoff");
        assert!(find_scenario(DEFAULT_SCENARIO).is_ok());

        let err = find_scenario("moon_base").unwrap_err();
        assert!(matches!(err, NegotiationError::InvalidInput(ref msg) if msg.contains("moon_base")));
    }

    #[test]
    fn test_all_ranges_inside_unit_interval() {
        for scenario in SCENARIOS {
            for range in [
                scenario.ethical_state,
                scenario.microsocial_weight,
                scenario.data_sharing,
                scenario.regulation,
                scenario.profit_focus,
                scenario.governance,
                scenario.hypernorm_weight,
                scenario.microsocial_contract,
            ] {
                assert!(range.min >= 0.0 && range.max <= 1.0 && range.min <= range.max,
                    "{} has bad range {:?}", scenario.name, range);
            }
        }
    }

    #[test]
    fn test_degenerate_range_returns_min() {
        let mut rng = SmallRng::seed_from_u64(5);
        assert_eq!(SampleRange::new(0.4, 0.4).sample(&mut rng), 0.4);
    }

    #[test]
    fn test_names_unique() {
        let mut names = scenario_names();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SCENARIOS.len());
    }
}
