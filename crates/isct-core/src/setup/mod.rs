//! Setup
//!
//! Scenario presets and agent spawning.

pub mod agents;
pub mod scenarios;

pub use agents::*;
pub use scenarios::*;
