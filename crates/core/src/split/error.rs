//! Error types for share allocation.

use thiserror::Error;

/// Errors that can occur while allocating expense shares.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// Expense amount must be positive.
    #[error("Expense amount must be positive")]
    InvalidAmount,

    /// At least one participant is required.
    #[error("At least one participant is required")]
    NoParticipants,
}

impl SplitError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::NoParticipants => "NO_PARTICIPANTS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SplitError::InvalidAmount.error_code(), "INVALID_AMOUNT");
        assert_eq!(SplitError::NoParticipants.error_code(), "NO_PARTICIPANTS");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            SplitError::InvalidAmount.to_string(),
            "Expense amount must be positive"
        );
        assert_eq!(
            SplitError::NoParticipants.to_string(),
            "At least one participant is required"
        );
    }
}
