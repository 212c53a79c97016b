//! Negotiation Records
//!
//! Serializable records of individual negotiations and the hash-chained
//! ledger entries that wrap them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Hypernorm;

/// Hash carried by the first ledger entry as its predecessor.
pub const GENESIS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Generates a record ID with the given sequence number.
pub fn generate_record_id(sequence: u64) -> String {
    format!("neg_{:08}", sequence)
}

/// Accept/reject decision of a strict negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    Rejected { violated: Hypernorm },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// The hypernorm that caused a rejection, if any
    pub fn violated(&self) -> Option<Hypernorm> {
        match self {
            Verdict::Accepted => None,
            Verdict::Rejected { violated } => Some(*violated),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => f.write_str("accepted"),
            Verdict::Rejected { violated } => write!(f, "rejected ({} violated)", violated),
        }
    }
}

/// One negotiation between two agents in one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationRecord {
    pub record_id: String,
    pub round: u32,
    pub agent_a: String,
    pub agent_b: String,
    pub strategy: String,
    /// Agreement score; strict verdicts map to 1.0 (accepted) or 0.0 (rejected)
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    pub explanation: String,
}

/// A record as stored in the decision ledger, chained to its predecessor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub sequence: u64,
    pub prev_hash: String,
    pub hash: String,
    pub record: NegotiationRecord,
}
