//! Shared negotiation types and serialization for the ISCT simulator.
//!
//! This crate contains pure data structures with no negotiation logic.
//! It is a dependency for the other crates in the workspace.

pub mod hypernorm;
pub mod record;
pub mod report;

// Re-export hypernorm types
pub use hypernorm::{Hypernorm, HypernormWeights, ParseHypernormError};

// Re-export record types
pub use record::{generate_record_id, LedgerEntry, NegotiationRecord, Verdict, GENESIS_HASH};

// Re-export report types
pub use report::{
    generate_report_id, LeaderboardEntry, RoundPoint, RunReport, TrustBar,
};
