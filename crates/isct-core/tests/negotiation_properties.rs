//! Property tests for negotiation scoring and drift

use isct_core::systems::{DriftRules, NegotiationEngine, NegotiationStrategy, Personality};
use isct_core::{Agent, BusinessAttributes};
use isct_events::{Hypernorm, HypernormWeights, Verdict};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

const STRATEGIES: [NegotiationStrategy; 6] = [
    NegotiationStrategy::SimpleAverage,
    NegotiationStrategy::Personality(Personality::Balanced),
    NegotiationStrategy::Personality(Personality::Aggressive),
    NegotiationStrategy::Personality(Personality::Cooperative),
    NegotiationStrategy::MultiAttributeWeighted,
    NegotiationStrategy::StrictThreshold,
];

fn weights() -> impl Strategy<Value = HypernormWeights> {
    prop::array::uniform5(0.0f32..=1.0).prop_map(|w| HypernormWeights {
        fairness: w[0],
        transparency: w[1],
        privacy: w[2],
        accountability: w[3],
        cultural_respect: w[4],
    })
}

fn attributes() -> impl Strategy<Value = BusinessAttributes> {
    prop::array::uniform4(0.0f32..=1.0).prop_map(|v| BusinessAttributes {
        data_sharing: v[0],
        regulation: v[1],
        profit_focus: v[2],
        governance: v[3],
    })
}

prop_compose! {
    fn agent(id: &'static str)(
        state in 0.0f32..=1.0,
        blend in 0.0f32..=1.0,
        attributes in attributes(),
        hypernorms in weights(),
        microsocial in weights(),
    ) -> Agent {
        Agent::new(id, id)
            .with_ethical_state(state)
            .with_microsocial_weight(blend)
            .with_attributes(attributes)
            .with_hypernorms(hypernorms)
            .with_microsocial(microsocial)
    }
}

fn neutral(id: &str, state: f32) -> Agent {
    Agent::new(id, id).with_ethical_state(state)
}

proptest! {
    #[test]
    fn prop_scoring_is_symmetric(a in agent("agent_a"), b in agent("agent_b")) {
        for strategy in STRATEGIES {
            let engine = NegotiationEngine::new(strategy);
            let forward = engine.score(&a, &b).unwrap();
            let backward = engine.score(&b, &a).unwrap();
            prop_assert_eq!(forward.value(), backward.value(), "{} not symmetric", strategy);
            prop_assert_eq!(forward.verdict(), backward.verdict());
        }
    }

    #[test]
    fn prop_cooperative_is_capped_and_monotone(
        a in 0.0f32..=1.0,
        b in 0.0f32..=1.0,
        bump in 0.0f32..=0.5,
    ) {
        let engine = NegotiationEngine::new(NegotiationStrategy::Personality(Personality::Cooperative));
        let low = engine.score(&neutral("agent_a", a), &neutral("agent_b", b)).unwrap().value();
        let high = engine
            .score(&neutral("agent_a", a + bump), &neutral("agent_b", b))
            .unwrap()
            .value();

        prop_assert!(low <= 1.0);
        prop_assert!(high <= 1.0);
        prop_assert!(high >= low);
    }

    #[test]
    fn prop_aggressive_stays_in_unit_range(a in -1.0f32..=2.0, b in -1.0f32..=2.0) {
        let engine = NegotiationEngine::new(NegotiationStrategy::Personality(Personality::Aggressive));
        let score = engine.score(&neutral("agent_a", a), &neutral("agent_b", b)).unwrap().value();
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn prop_weighted_score_in_unit_range(a in agent("agent_a"), b in agent("agent_b")) {
        let engine = NegotiationEngine::new(NegotiationStrategy::MultiAttributeWeighted);
        let score = engine.score(&a, &b).unwrap().value();
        prop_assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
    }

    #[test]
    fn prop_equal_states_settle_on_that_state(state in 0.0f32..=1.0) {
        let engine = NegotiationEngine::new(NegotiationStrategy::SimpleAverage);
        let score = engine
            .score(&neutral("agent_a", state), &neutral("agent_b", state))
            .unwrap()
            .value();
        prop_assert_eq!(score, state);
    }

    #[test]
    fn prop_personality_drift_stays_clamped(state in 0.0f32..=1.0, seed in any::<u64>()) {
        let engine = NegotiationEngine::new(NegotiationStrategy::Personality(Personality::Balanced));
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut a = neutral("agent_a", state);
        let mut b = neutral("agent_b", 1.0 - state);

        for round in 1..=20 {
            engine.negotiate(&mut a, &mut b, round, &mut rng).unwrap();
            prop_assert!((0.0..=1.0).contains(&a.ethical_state));
            prop_assert!((0.0..=1.0).contains(&b.ethical_state));
        }
        prop_assert_eq!(a.history().len(), 20);
    }
}

#[test]
fn test_simple_average_gap_converges() {
    let engine = NegotiationEngine::new(NegotiationStrategy::SimpleAverage);
    let mut rng = SmallRng::seed_from_u64(0);
    let mut a = neutral("agent_a", 0.1);
    let mut b = neutral("agent_b", 0.9);

    let mut gap = (a.ethical_state - b.ethical_state).abs();
    for round in 1..=40 {
        engine.negotiate(&mut a, &mut b, round, &mut rng).unwrap();
        let next = (a.ethical_state - b.ethical_state).abs();
        if round <= 10 {
            assert!(next < gap, "gap did not shrink in round {}", round);
        }
        gap = next;
    }
    assert!(gap < 1e-5, "gap {} after 40 rounds", gap);
}

#[test]
fn test_weighted_drift_converges_attributes() {
    let engine = NegotiationEngine::new(NegotiationStrategy::MultiAttributeWeighted);
    let mut rng = SmallRng::seed_from_u64(0);
    let mut a = neutral("agent_a", 0.2).with_attributes(BusinessAttributes::uniform(0.1));
    let mut b = neutral("agent_b", 0.8).with_attributes(BusinessAttributes::uniform(0.9));

    for round in 1..=40 {
        engine.negotiate(&mut a, &mut b, round, &mut rng).unwrap();
    }

    assert!((a.attributes.data_sharing - b.attributes.data_sharing).abs() < 1e-5);
    assert!((a.ethical_state - b.ethical_state).abs() < 1e-5);
}

#[test]
fn test_strict_fairness_violation_then_acceptance() {
    let engine = NegotiationEngine::new(NegotiationStrategy::StrictThreshold);
    let mut rng = SmallRng::seed_from_u64(0);
    let mut a = neutral("agent_a", 0.5)
        .with_microsocial(HypernormWeights::uniform(0.5).with(Hypernorm::Fairness, 0.0));
    let mut b = neutral("agent_b", 0.5)
        .with_microsocial(HypernormWeights::uniform(0.5).with(Hypernorm::Fairness, 0.9));

    let outcome = engine.negotiate(&mut a, &mut b, 1, &mut rng).unwrap();
    assert_eq!(
        outcome.verdict(),
        Some(Verdict::Rejected { violated: Hypernorm::Fairness })
    );
    assert_eq!(outcome.value(), 0.0);
    // Verdicts never move the agents
    assert_eq!(a.ethical_state, 0.5);
    assert_eq!(a.microsocial.fairness, 0.0);

    b.microsocial.fairness = 0.4;
    let outcome = engine.negotiate(&mut a, &mut b, 2, &mut rng).unwrap();
    assert_eq!(outcome.verdict(), Some(Verdict::Accepted));
    assert_eq!(outcome.value(), 1.0);
    assert_eq!(b.history().len(), 2);
}

#[test]
fn test_unclamped_drift_can_leave_unit_range() {
    let engine = NegotiationEngine::new(NegotiationStrategy::Personality(Personality::Balanced))
        .with_drift(DriftRules {
            perturbation_min: 0.1,
            perturbation_max: 0.1,
            clamp: false,
            ..DriftRules::default()
        });
    let mut rng = SmallRng::seed_from_u64(0);
    let mut a = neutral("agent_a", 0.95);
    let mut b = neutral("agent_b", 0.95);

    engine.negotiate(&mut a, &mut b, 1, &mut rng).unwrap();
    assert!(a.ethical_state > 1.0);
}
