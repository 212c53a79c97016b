//! Drift System
//!
//! How agents move after a negotiation: smoothing toward the agreed score, or
//! a random trust perturbation that ignores it.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::components::agent::{Agent, BusinessAttribute};
use crate::error::NegotiationError;
use crate::systems::negotiation::{NegotiationOutcome, NegotiationStrategy};

/// Parameters for post-negotiation updates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftRules {
    /// Share of the gap to the score closed per negotiation (0.5 halves it)
    pub smoothing: f32,
    /// Lower bound of the trust perturbation
    pub perturbation_min: f32,
    /// Upper bound of the trust perturbation
    pub perturbation_max: f32,
    /// Clamp perturbed trust to 0.0 to 1.0
    pub clamp: bool,
}

impl Default for DriftRules {
    fn default() -> Self {
        Self {
            smoothing: 0.5,
            perturbation_min: -0.05,
            perturbation_max: 0.10,
            clamp: true,
        }
    }
}

impl DriftRules {
    pub fn validate(&self) -> Result<(), NegotiationError> {
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(NegotiationError::invalid(format!(
                "smoothing {} outside [0, 1]",
                self.smoothing
            )));
        }
        if !self.perturbation_min.is_finite() || !self.perturbation_max.is_finite() {
            return Err(NegotiationError::invalid(format!(
                "perturbation range [{}, {}] is not finite",
                self.perturbation_min, self.perturbation_max
            )));
        }
        if self.perturbation_min > self.perturbation_max {
            return Err(NegotiationError::invalid(format!(
                "perturbation range [{}, {}] is empty",
                self.perturbation_min, self.perturbation_max
            )));
        }
        Ok(())
    }

    /// Exponential moving average step from `current` toward `target`
    pub fn smooth(&self, current: f32, target: f32) -> f32 {
        current * (1.0 - self.smoothing) + target * self.smoothing
    }

    /// Add a uniform random delta, independent of any score
    pub fn perturb(&self, value: f32, rng: &mut SmallRng) -> f32 {
        let delta = if self.perturbation_min < self.perturbation_max {
            rng.gen_range(self.perturbation_min..=self.perturbation_max)
        } else {
            self.perturbation_min
        };
        let next = value + delta;
        if self.clamp {
            next.clamp(0.0, 1.0)
        } else {
            next
        }
    }
}

/// Apply the strategy's update to both agents.
/// The same outcome reaches both sides; only the random draws differ.
pub fn apply_drift(
    strategy: NegotiationStrategy,
    outcome: &NegotiationOutcome,
    a: &mut Agent,
    b: &mut Agent,
    rules: &DriftRules,
    rng: &mut SmallRng,
) {
    let score = outcome.value();
    match strategy {
        NegotiationStrategy::SimpleAverage => {
            a.ethical_state = rules.smooth(a.ethical_state, score);
            b.ethical_state = rules.smooth(b.ethical_state, score);
        }
        NegotiationStrategy::Personality(_) => {
            a.ethical_state = rules.perturb(a.ethical_state, rng);
            b.ethical_state = rules.perturb(b.ethical_state, rng);
        }
        NegotiationStrategy::MultiAttributeWeighted => {
            for agent in [a, b] {
                for attribute in BusinessAttribute::ALL {
                    let next = rules.smooth(agent.attributes.get(attribute), score);
                    agent.attributes.set(attribute, next);
                }
                agent.ethical_state = rules.smooth(agent.ethical_state, score);
            }
        }
        // Verdicts are recorded, never blended into state
        NegotiationStrategy::StrictThreshold => {}
    }
}
