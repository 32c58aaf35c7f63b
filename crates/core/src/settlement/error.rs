//! Error types for settlement validation.

use thiserror::Error;

/// Errors that can occur while validating a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// Payer and receiver must be different members.
    #[error("Payer and receiver must be different members")]
    SameParty,

    /// Settlement amount must be positive.
    #[error("Settlement amount must be positive")]
    InvalidAmount,
}

impl SettlementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::SameParty => "SAME_PARTY",
            Self::InvalidAmount => "INVALID_AMOUNT",
        }
    }
}
