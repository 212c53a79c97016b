//! Error Types
//!
//! Failures of the negotiation engine itself. Arithmetic never fails; every
//! error here is a caller handing the engine something it cannot use.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NegotiationError {
    /// Out-of-range values, self-negotiation, too few agents, unknown names
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl NegotiationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        NegotiationError::InvalidInput(message.into())
    }
}
