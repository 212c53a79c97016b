//! ISCT negotiation simulator library
//!
//! Agents carrying hypernorm and microsocial contract weights negotiate in
//! pairs, round after round, under one of several scoring strategies.

pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod output;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use components::*;
pub use config::{Config, ConfigError};
pub use error::NegotiationError;
pub use simulation::{RoundObserver, RoundSummary, Simulation, SimulationError};
pub use systems::{NegotiationEngine, NegotiationOutcome, NegotiationStrategy, Personality};
