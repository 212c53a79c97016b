//! Pairing System
//!
//! Chooses which agents negotiate in a round.

use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Round schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Pairing {
    /// One random pair of distinct agents per round
    #[default]
    RandomPair,
    /// Every unordered pair once per round, in slot order
    AllPairs,
}

/// Slot pairs for one round. Never pairs a slot with itself; empty when
/// fewer than two agents exist.
pub fn schedule_round(pairing: Pairing, population: usize, rng: &mut SmallRng) -> Vec<(usize, usize)> {
    if population < 2 {
        return Vec::new();
    }

    match pairing {
        Pairing::RandomPair => {
            let first = rng.gen_range(0..population);
            let mut second = rng.gen_range(0..population - 1);
            if second >= first {
                second += 1;
            }
            vec![(first, second)]
        }
        Pairing::AllPairs => (0..population)
            .flat_map(|i| ((i + 1)..population).map(move |j| (i, j)))
            .collect(),
    }
}
