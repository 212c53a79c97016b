//! Agent Spawning
//!
//! Functions to spawn agents with attributes sampled from a scenario preset.

use isct_events::{Hypernorm, HypernormWeights};
use rand::rngs::SmallRng;

use crate::components::agent::{Agent, BusinessAttributes};
use crate::setup::scenarios::{SampleRange, ScenarioPreset};

/// Names handed out in order; wrap around with a numeric suffix
const AGENT_NAMES: &[&str] = &[
    "Aster", "Borealis", "Cygnus", "Draco", "Eridanus", "Fornax", "Gemma", "Hydra",
    "Indus", "Juno", "Kepler", "Lyra", "Mensa", "Norma", "Orion", "Pavo",
    "Quasar", "Rigel", "Sagitta", "Tucana", "Ursa", "Vela", "Wezen", "Zosma",
];

/// Generate agent ID
pub fn generate_agent_id(index: usize) -> String {
    format!("agent_{:03}", index)
}

/// Generate a display name, unique for any index
pub fn generate_name(index: usize) -> String {
    let base = AGENT_NAMES[index % AGENT_NAMES.len()];
    match index / AGENT_NAMES.len() {
        0 => base.to_string(),
        cycle => format!("{} {}", base, cycle + 1),
    }
}

fn sample_weights(range: SampleRange, rng: &mut SmallRng) -> HypernormWeights {
    let mut weights = HypernormWeights::uniform(0.0);
    for hypernorm in Hypernorm::ALL {
        weights.set(hypernorm, range.sample(rng));
    }
    weights
}

/// Spawn one agent. Draw order is fixed so a seed reproduces the same agent.
pub fn spawn_agent(index: usize, preset: &ScenarioPreset, rng: &mut SmallRng) -> Agent {
    let ethical_state = preset.ethical_state.sample(rng);
    let microsocial_weight = preset.microsocial_weight.sample(rng);
    let attributes = BusinessAttributes {
        data_sharing: preset.data_sharing.sample(rng),
        regulation: preset.regulation.sample(rng),
        profit_focus: preset.profit_focus.sample(rng),
        governance: preset.governance.sample(rng),
    };
    let hypernorms = sample_weights(preset.hypernorm_weight, rng);
    let microsocial = sample_weights(preset.microsocial_contract, rng);

    Agent::new(generate_agent_id(index), generate_name(index))
        .with_ethical_state(ethical_state)
        .with_microsocial_weight(microsocial_weight)
        .with_attributes(attributes)
        .with_hypernorms(hypernorms)
        .with_microsocial(microsocial)
}

/// Spawn `count` agents for a scenario
pub fn spawn_agents(count: usize, preset: &ScenarioPreset, rng: &mut SmallRng) -> Vec<Agent> {
    (0..count).map(|i| spawn_agent(i, preset, rng)).collect()
}
