//! Negotiation Engine
//!
//! Scores a negotiation between two agents under one strategy, explains the
//! result, and applies it to both agents.

use isct_events::{Hypernorm, Verdict};
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::components::agent::{Agent, BusinessAttribute, BusinessAttributes, OutcomeEntry};
use crate::error::NegotiationError;
use crate::systems::drift::{apply_drift, DriftRules};

/// Constants used by the scoring formulas
pub mod negotiation_constants {
    /// States closer than this are in hypernorm agreement
    pub const AGREEMENT_THRESHOLD: f32 = 0.2;
    /// Microsocial weights further apart than this violate a hypernorm
    pub const VIOLATION_THRESHOLD: f32 = 0.5;
    /// Penalty per unit of trust gap for aggressive negotiators
    pub const AGGRESSIVE_GAP_PENALTY: f32 = 0.5;
    /// Divisor for cooperative negotiators (rewards combined trust)
    pub const COOPERATIVE_DIVISOR: f32 = 1.8;
    /// Number of hypernorm terms averaged by weighted negotiation
    pub const HYPERNORM_TERMS: f32 = 5.0;
    /// Number of business attributes averaged by weighted negotiation
    pub const BUSINESS_TERMS: f32 = 4.0;
}

use negotiation_constants::*;

/// Negotiating temperament used by the personality strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    #[default]
    Balanced,
    Aggressive,
    Cooperative,
}

impl Personality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Balanced => "balanced",
            Personality::Aggressive => "aggressive",
            Personality::Cooperative => "cooperative",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Personality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balanced" => Ok(Personality::Balanced),
            "aggressive" => Ok(Personality::Aggressive),
            "cooperative" => Ok(Personality::Cooperative),
            other => Err(format!(
                "unknown personality '{}' (expected balanced, aggressive or cooperative)",
                other
            )),
        }
    }
}

/// How a pair of agents reaches an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationStrategy {
    SimpleAverage,
    Personality(Personality),
    MultiAttributeWeighted,
    StrictThreshold,
}

impl NegotiationStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            NegotiationStrategy::SimpleAverage => "simple_average",
            NegotiationStrategy::Personality(_) => "personality",
            NegotiationStrategy::MultiAttributeWeighted => "multi_attribute_weighted",
            NegotiationStrategy::StrictThreshold => "strict_threshold",
        }
    }
}

impl fmt::Display for NegotiationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NegotiationStrategy::Personality(tag) => write!(f, "personality ({})", tag),
            other => f.write_str(other.name()),
        }
    }
}

/// Whether scores keep their natural range or are clamped to 0.0 to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRange {
    #[default]
    Raw,
    Clamped,
}

impl ScoreRange {
    pub fn apply(&self, score: f32) -> f32 {
        match self {
            ScoreRange::Raw => score,
            ScoreRange::Clamped => score.clamp(0.0, 1.0),
        }
    }
}

/// Thresholds and range policy for scoring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegotiationRules {
    pub agreement_threshold: f32,
    pub violation_threshold: f32,
    pub score_range: ScoreRange,
}

impl Default for NegotiationRules {
    fn default() -> Self {
        Self {
            agreement_threshold: AGREEMENT_THRESHOLD,
            violation_threshold: VIOLATION_THRESHOLD,
            score_range: ScoreRange::Raw,
        }
    }
}

/// Which branch or inputs produced a continuous score
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreBasis {
    /// States within the agreement threshold; plain mean
    HypernormAgreement,
    /// States diverge; each agent's microsocial weight scales its own state
    MicrosocialBlend,
    Personality(Personality),
    Weighted { business: f32, hypernorm: f32 },
}

/// Result of one negotiation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NegotiationOutcome {
    Score { value: f32, basis: ScoreBasis },
    Verdict(Verdict),
}

impl NegotiationOutcome {
    /// Scalar value for plotting; verdicts map to 1.0 (accepted) or 0.0 (rejected)
    pub fn value(&self) -> f32 {
        match self {
            NegotiationOutcome::Score { value, .. } => *value,
            NegotiationOutcome::Verdict(verdict) if verdict.is_accepted() => 1.0,
            NegotiationOutcome::Verdict(_) => 0.0,
        }
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            NegotiationOutcome::Verdict(verdict) => Some(*verdict),
            NegotiationOutcome::Score { .. } => None,
        }
    }
}

/// Simple-average score and the branch that produced it
pub fn simple_average_score(a: &Agent, b: &Agent, agreement_threshold: f32) -> (f32, ScoreBasis) {
    let gap = (a.ethical_state - b.ethical_state).abs();
    if gap < agreement_threshold {
        ((a.ethical_state + b.ethical_state) / 2.0, ScoreBasis::HypernormAgreement)
    } else {
        let blended =
            (a.microsocial_weight * a.ethical_state + b.microsocial_weight * b.ethical_state) / 2.0;
        (blended, ScoreBasis::MicrosocialBlend)
    }
}

/// Personality score from the two trust values
pub fn personality_score(personality: Personality, trust_a: f32, trust_b: f32) -> f32 {
    match personality {
        Personality::Aggressive => {
            (1.0 - AGGRESSIVE_GAP_PENALTY * (trust_a - trust_b).abs()).max(0.0)
        }
        Personality::Cooperative => ((trust_a + trust_b) / COOPERATIVE_DIVISOR).min(1.0),
        Personality::Balanced => (trust_a + trust_b) / 2.0,
    }
}

/// Mean over the four business attributes of the pairwise attribute mean
pub fn business_average(a: &BusinessAttributes, b: &BusinessAttributes) -> f32 {
    let sum: f32 = BusinessAttribute::ALL
        .into_iter()
        .map(|attribute| (a.get(attribute) + b.get(attribute)) / 2.0)
        .sum();
    sum / BUSINESS_TERMS
}

/// Unweighted term for one hypernorm, read from the attribute it governs.
///
/// Privacy and accountability score 0.5 at a neutral attribute of 0.5, so two
/// all-neutral agents with unit weights settle at 0.65, not 0.5.
pub fn hypernorm_term(hypernorm: Hypernorm, attributes: &BusinessAttributes) -> f32 {
    match hypernorm {
        Hypernorm::Fairness => 1.0 - (attributes.data_sharing - 0.5).abs(),
        Hypernorm::Transparency => 1.0 - (attributes.regulation - 0.5).abs(),
        Hypernorm::Privacy => 1.0 - attributes.data_sharing,
        Hypernorm::Accountability => attributes.governance,
        Hypernorm::CulturalRespect => 1.0 - (attributes.profit_focus - 0.5).abs(),
    }
}

/// Mean of the five weighted hypernorm terms for one agent
pub fn hypernorm_score(agent: &Agent) -> f32 {
    let sum: f32 = agent
        .hypernorms
        .iter()
        .map(|(hypernorm, weight)| weight * hypernorm_term(hypernorm, &agent.attributes))
        .sum();
    sum / HYPERNORM_TERMS
}

/// First hypernorm, in canonical order, whose microsocial weights differ by
/// more than the threshold
pub fn strict_verdict(a: &Agent, b: &Agent, violation_threshold: f32) -> Verdict {
    Hypernorm::ALL
        .into_iter()
        .find(|&h| (a.microsocial.get(h) - b.microsocial.get(h)).abs() > violation_threshold)
        .map(|violated| Verdict::Rejected { violated })
        .unwrap_or(Verdict::Accepted)
}

/// Scores, explains and applies negotiations under one strategy
#[derive(Debug, Clone)]
pub struct NegotiationEngine {
    strategy: NegotiationStrategy,
    rules: NegotiationRules,
    drift: DriftRules,
}

impl NegotiationEngine {
    pub fn new(strategy: NegotiationStrategy) -> Self {
        Self {
            strategy,
            rules: NegotiationRules::default(),
            drift: DriftRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: NegotiationRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_drift(mut self, drift: DriftRules) -> Self {
        self.drift = drift;
        self
    }

    pub fn strategy(&self) -> NegotiationStrategy {
        self.strategy
    }

    pub fn rules(&self) -> &NegotiationRules {
        &self.rules
    }

    /// Compute the outcome without touching either agent
    pub fn score(&self, a: &Agent, b: &Agent) -> Result<NegotiationOutcome, NegotiationError> {
        if a.id == b.id {
            return Err(NegotiationError::invalid(format!(
                "agent {} cannot negotiate with itself",
                a.id
            )));
        }

        let range = self.rules.score_range;
        let outcome = match self.strategy {
            NegotiationStrategy::SimpleAverage => {
                let (value, basis) = simple_average_score(a, b, self.rules.agreement_threshold);
                NegotiationOutcome::Score {
                    value: range.apply(value),
                    basis,
                }
            }
            NegotiationStrategy::Personality(personality) => NegotiationOutcome::Score {
                value: range.apply(personality_score(
                    personality,
                    a.ethical_state,
                    b.ethical_state,
                )),
                basis: ScoreBasis::Personality(personality),
            },
            NegotiationStrategy::MultiAttributeWeighted => {
                let business = business_average(&a.attributes, &b.attributes);
                let hypernorm = (hypernorm_score(a) + hypernorm_score(b)) / 2.0;
                NegotiationOutcome::Score {
                    value: range.apply((business + hypernorm) / 2.0),
                    basis: ScoreBasis::Weighted { business, hypernorm },
                }
            }
            NegotiationStrategy::StrictThreshold => NegotiationOutcome::Verdict(strict_verdict(
                a,
                b,
                self.rules.violation_threshold,
            )),
        };
        Ok(outcome)
    }

    /// One-line explanation of an outcome, read against the agents' state
    /// before the outcome was applied
    pub fn explain(&self, outcome: &NegotiationOutcome, a: &Agent, b: &Agent) -> String {
        match outcome {
            NegotiationOutcome::Score { value, basis } => match basis {
                ScoreBasis::HypernormAgreement => format!(
                    "{} and {} share hypernorm agreement (gap {:.2} < {:.2}); settled at {:.3}",
                    a.name,
                    b.name,
                    (a.ethical_state - b.ethical_state).abs(),
                    self.rules.agreement_threshold,
                    value
                ),
                ScoreBasis::MicrosocialBlend => format!(
                    "{} and {} diverge (gap {:.2}); microsocial blend gives {:.3}",
                    a.name,
                    b.name,
                    (a.ethical_state - b.ethical_state).abs(),
                    value
                ),
                ScoreBasis::Personality(personality) => format!(
                    "{} negotiation between {} (trust {:.2}) and {} (trust {:.2}) scored {:.3}",
                    personality, a.name, a.ethical_state, b.name, b.ethical_state, value
                ),
                ScoreBasis::Weighted { business, hypernorm } => format!(
                    "{} and {}: business alignment {:.3}, hypernorm score {:.3}, agreement {:.3}",
                    a.name, b.name, business, hypernorm, value
                ),
            },
            NegotiationOutcome::Verdict(Verdict::Accepted) => format!(
                "{} and {} accepted: no microsocial weight differs by more than {:.2}",
                a.name, b.name, self.rules.violation_threshold
            ),
            NegotiationOutcome::Verdict(Verdict::Rejected { violated }) => format!(
                "{} and {} rejected: {} weights differ by {:.2}",
                a.name,
                b.name,
                violated,
                (a.microsocial.get(*violated) - b.microsocial.get(*violated)).abs()
            ),
        }
    }

    /// Apply an outcome to both agents and record it in both histories
    pub fn apply(
        &self,
        outcome: &NegotiationOutcome,
        a: &mut Agent,
        b: &mut Agent,
        round: u32,
        rng: &mut SmallRng,
    ) {
        apply_drift(self.strategy, outcome, a, b, &self.drift, rng);

        let score = outcome.value();
        let verdict = outcome.verdict();
        a.record(OutcomeEntry {
            round,
            partner: b.id.clone(),
            score,
            verdict,
        });
        b.record(OutcomeEntry {
            round,
            partner: a.id.clone(),
            score,
            verdict,
        });
    }

    /// Score the pair, then apply the outcome to both agents
    pub fn negotiate(
        &self,
        a: &mut Agent,
        b: &mut Agent,
        round: u32,
        rng: &mut SmallRng,
    ) -> Result<NegotiationOutcome, NegotiationError> {
        let outcome = self.score(a, b)?;
        tracing::debug!(
            round,
            agent_a = %a.id,
            agent_b = %b.id,
            strategy = self.strategy.name(),
            score = outcome.value(),
            "negotiated"
        );
        self.apply(&outcome, a, b, round, rng);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isct_events::HypernormWeights;
    use rand::SeedableRng;

    fn agent(id: &str, state: f32) -> Agent {
        Agent::new(id, id).with_ethical_state(state)
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn test_simple_average_agreement_branch() {
        let engine = NegotiationEngine::new(NegotiationStrategy::SimpleAverage);
        let outcome = engine.score(&agent("a", 0.4), &agent("b", 0.5)).unwrap();

        match outcome {
            NegotiationOutcome::Score { value, basis } => {
                assert!((value - 0.45).abs() < 1e-6);
                assert_eq!(basis, ScoreBasis::HypernormAgreement);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_simple_average_blend_branch() {
        let engine = NegotiationEngine::new(NegotiationStrategy::SimpleAverage);
        let a = agent("a", 0.2).with_microsocial_weight(1.0);
        let b = agent("b", 0.8).with_microsocial_weight(0.5);

        let outcome = engine.score(&a, &b).unwrap();
        // (1.0 * 0.2 + 0.5 * 0.8) / 2
        assert!((outcome.value() - 0.3).abs() < 1e-6);
        assert!(matches!(
            outcome,
            NegotiationOutcome::Score {
                basis: ScoreBasis::MicrosocialBlend,
                ..
            }
        ));
    }

    #[test]
    fn test_gap_equal_to_threshold_blends() {
        let (_, basis) = simple_average_score(&agent("a", 0.25), &agent("b", 0.5), 0.25);
        assert_eq!(basis, ScoreBasis::MicrosocialBlend);
    }

    #[test]
    fn test_simple_average_update_halves_gap() {
        let engine = NegotiationEngine::new(NegotiationStrategy::SimpleAverage);
        let mut a = agent("a", 0.4);
        let mut b = agent("b", 0.5);

        let outcome = engine.negotiate(&mut a, &mut b, 1, &mut rng()).unwrap();
        let score = outcome.value();

        assert_eq!(a.ethical_state, (0.4 + score) / 2.0);
        assert_eq!(b.ethical_state, (0.5 + score) / 2.0);
        assert!((b.ethical_state - a.ethical_state - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_personality_formulas() {
        assert!((personality_score(Personality::Balanced, 0.4, 0.8) - 0.6).abs() < 1e-6);
        assert!((personality_score(Personality::Aggressive, 0.2, 0.8) - 0.7).abs() < 1e-6);
        assert!((personality_score(Personality::Cooperative, 0.9, 0.9) - 1.0).abs() < 1e-6);
        assert!((personality_score(Personality::Cooperative, 0.45, 0.45) - 0.5).abs() < 1e-6);
        assert_eq!(personality_score(Personality::Cooperative, 1.0, 1.0), 1.0);
    }

    #[test]
    fn test_aggressive_floor_for_out_of_range_trust() {
        assert_eq!(personality_score(Personality::Aggressive, -2.0, 1.0), 0.0);
    }

    #[test]
    fn test_personality_drift_stays_in_bounds() {
        let engine = NegotiationEngine::new(NegotiationStrategy::Personality(
            Personality::Cooperative,
        ));
        let mut a = agent("a", 0.5);
        let mut b = agent("b", 0.6);
        let mut rng = rng();

        for round in 1..=50 {
            let before_a = a.ethical_state;
            engine.negotiate(&mut a, &mut b, round, &mut rng).unwrap();
            let delta = a.ethical_state - before_a;
            assert!(delta >= -0.05 - 1e-6 && delta <= 0.10 + 1e-6);
            assert!((0.0..=1.0).contains(&a.ethical_state));
            assert!((0.0..=1.0).contains(&b.ethical_state));
        }
        assert_eq!(a.history().len(), 50);
    }

    #[test]
    fn test_hypernorm_terms() {
        let attributes = BusinessAttributes {
            data_sharing: 0.8,
            regulation: 0.1,
            profit_focus: 0.5,
            governance: 0.7,
        };
        assert!((hypernorm_term(Hypernorm::Fairness, &attributes) - 0.7).abs() < 1e-6);
        assert!((hypernorm_term(Hypernorm::Transparency, &attributes) - 0.6).abs() < 1e-6);
        assert!((hypernorm_term(Hypernorm::Privacy, &attributes) - 0.2).abs() < 1e-6);
        assert!((hypernorm_term(Hypernorm::Accountability, &attributes) - 0.7).abs() < 1e-6);
        assert!((hypernorm_term(Hypernorm::CulturalRespect, &attributes) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_midpoint_scenario() {
        let engine = NegotiationEngine::new(NegotiationStrategy::MultiAttributeWeighted);
        let a = agent("a", 0.5);
        let b = agent("b", 0.5);

        match engine.score(&a, &b).unwrap() {
            NegotiationOutcome::Score {
                value,
                basis: ScoreBasis::Weighted { business, hypernorm },
            } => {
                assert_eq!(business, 0.5);
                // (1.0 + 1.0 + 0.5 + 0.5 + 1.0) / 5
                assert!((hypernorm - 0.8).abs() < 1e-6);
                assert!((value - 0.65).abs() < 1e-6);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_weighted_zero_weights() {
        let engine = NegotiationEngine::new(NegotiationStrategy::MultiAttributeWeighted);
        let a = agent("a", 0.5).with_hypernorms(HypernormWeights::uniform(0.0));
        let b = agent("b", 0.5).with_hypernorms(HypernormWeights::uniform(0.0));

        assert!((engine.score(&a, &b).unwrap().value() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_update_moves_attributes_toward_score() {
        let engine = NegotiationEngine::new(NegotiationStrategy::MultiAttributeWeighted);
        let mut a = agent("a", 0.5).with_attributes(BusinessAttributes::uniform(0.9));
        let mut b = agent("b", 0.5).with_attributes(BusinessAttributes::uniform(0.1));

        let score = engine.negotiate(&mut a, &mut b, 1, &mut rng()).unwrap().value();

        assert_eq!(a.attributes.data_sharing, (0.9 + score) / 2.0);
        assert_eq!(b.attributes.governance, (0.1 + score) / 2.0);
        assert_eq!(a.ethical_state, (0.5 + score) / 2.0);
    }

    #[test]
    fn test_strict_first_violation_wins() {
        let a = agent("a", 0.5).with_microsocial(HypernormWeights::uniform(0.0));
        let b = agent("b", 0.5).with_microsocial(
            HypernormWeights::uniform(0.0)
                .with(Hypernorm::Privacy, 0.9)
                .with(Hypernorm::CulturalRespect, 0.9),
        );

        assert_eq!(
            strict_verdict(&a, &b, VIOLATION_THRESHOLD),
            Verdict::Rejected {
                violated: Hypernorm::Privacy
            }
        );
    }

    #[test]
    fn test_strict_difference_at_threshold_accepts() {
        let a = agent("a", 0.5).with_microsocial(HypernormWeights::uniform(0.25));
        let b = agent("b", 0.5).with_microsocial(HypernormWeights::uniform(0.75));
        assert_eq!(strict_verdict(&a, &b, 0.5), Verdict::Accepted);
    }

    #[test]
    fn test_strict_leaves_state_untouched() {
        let engine = NegotiationEngine::new(NegotiationStrategy::StrictThreshold);
        let mut a = agent("a", 0.3);
        let mut b = agent("b", 0.9);

        let outcome = engine.negotiate(&mut a, &mut b, 4, &mut rng()).unwrap();

        assert_eq!(outcome, NegotiationOutcome::Verdict(Verdict::Accepted));
        assert_eq!(outcome.value(), 1.0);
        assert_eq!(a.ethical_state, 0.3);
        assert_eq!(b.ethical_state, 0.9);
        assert_eq!(a.history()[0].verdict, Some(Verdict::Accepted));
        assert_eq!(b.history()[0].partner.as_str(), "a");
    }

    #[test]
    fn test_self_negotiation_rejected() {
        let engine = NegotiationEngine::new(NegotiationStrategy::SimpleAverage);
        let a = agent("a", 0.5);
        let twin = a.clone();

        assert!(matches!(
            engine.score(&a, &twin),
            Err(NegotiationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_clamped_range() {
        let rules = NegotiationRules {
            score_range: ScoreRange::Clamped,
            ..NegotiationRules::default()
        };
        let engine = NegotiationEngine::new(NegotiationStrategy::MultiAttributeWeighted)
            .with_rules(rules);
        let heavy = HypernormWeights::uniform(5.0);
        let a = agent("a", 0.5).with_hypernorms(heavy);
        let b = agent("b", 0.5).with_hypernorms(heavy);

        assert_eq!(engine.score(&a, &b).unwrap().value(), 1.0);

        let raw = NegotiationEngine::new(NegotiationStrategy::MultiAttributeWeighted);
        assert!(raw.score(&a, &b).unwrap().value() > 1.0);
    }

    #[test]
    fn test_explanations_name_the_branch() {
        let engine = NegotiationEngine::new(NegotiationStrategy::StrictThreshold);
        let a = agent("Aster", 0.5).with_microsocial(HypernormWeights::uniform(0.0));
        let b = agent("Borealis", 0.5)
            .with_microsocial(HypernormWeights::uniform(0.0).with(Hypernorm::Fairness, 0.8));

        let outcome = engine.score(&a, &b).unwrap();
        let text = engine.explain(&outcome, &a, &b);
        assert_eq!(text, "Aster and Borealis rejected: fairness weights differ by 0.80");
    }

    #[test]
    fn test_personality_from_str() {
        assert_eq!("cooperative".parse::<Personality>(), Ok(Personality::Cooperative));
        assert!("stubborn".parse::<Personality>().is_err());
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(NegotiationStrategy::SimpleAverage.to_string(), "simple_average");
        assert_eq!(
            NegotiationStrategy::Personality(Personality::Aggressive).to_string(),
            "personality (aggressive)"
        );
    }
}
