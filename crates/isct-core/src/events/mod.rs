//! Events
//!
//! Append-only decision ledger of negotiation records.

pub mod ledger;

pub use ledger::{entry_hash, verify_chain, DecisionLedger, LedgerError};
