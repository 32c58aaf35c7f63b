//! Settlement validation rules.
//!
//! A settlement records a real-world payment between two members. The rules
//! here run before anything is written; persistence and ownership checks
//! live in the storage layer.

pub mod error;

pub use error::SettlementError;

use rust_decimal::Decimal;

use splitpot_shared::types::UserId;

/// Validates a settlement before it is recorded.
///
/// The amount is never checked against the currently computed balance
/// between the parties; paying more than is owed simply flips the balance
/// direction.
///
/// # Errors
///
/// Returns `SettlementError::SameParty` if payer and receiver are the same
/// user, and `SettlementError::InvalidAmount` if the amount is not positive.
pub fn validate_settlement(
    from_user_id: UserId,
    to_user_id: UserId,
    amount: Decimal,
) -> Result<(), SettlementError> {
    if from_user_id == to_user_id {
        return Err(SettlementError::SameParty);
    }
    if amount <= Decimal::ZERO {
        return Err(SettlementError::InvalidAmount);
    }
    Ok(())
}
