//! Systems
//!
//! Negotiation scoring, post-negotiation drift, and round pairing.

pub mod drift;
pub mod negotiation;
pub mod pairing;

pub use drift::{apply_drift, DriftRules};
pub use negotiation::{
    business_average, hypernorm_score, hypernorm_term, personality_score, simple_average_score,
    strict_verdict, NegotiationEngine, NegotiationOutcome, NegotiationRules, NegotiationStrategy,
    Personality, ScoreBasis, ScoreRange,
};
pub use pairing::{schedule_round, Pairing};
