//! Components
//!
//! Agents and the population that owns them for a run.

pub mod agent;
pub mod population;

pub use agent::*;
pub use population::*;
