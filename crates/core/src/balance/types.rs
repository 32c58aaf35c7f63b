//! Domain types for balance computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use splitpot_shared::types::UserId;

/// Classification of a member's net position within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    /// Owed money by the group (balance > 0).
    Receive,
    /// Owes money to the group (balance < 0).
    Pay,
    /// Even with the group (balance within epsilon of zero).
    Settled,
}

impl BalanceStatus {
    /// Returns the lowercase string form used in API responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Receive => "receive",
            Self::Pay => "pay",
            Self::Settled => "settled",
        }
    }
}

/// One share row of an expense: a participant's allocated portion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareRow {
    /// The participant this share was allocated to.
    pub user_id: UserId,
    /// The allocated amount (non-negative).
    pub amount: Decimal,
}

/// An expense with its share rows, as read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRow {
    /// The member who paid the expense.
    pub payer_id: UserId,
    /// The full expense amount.
    pub amount: Decimal,
    /// The allocated shares (sum equals `amount`).
    pub shares: Vec<ShareRow>,
}

/// A recorded real-world payment between two members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementRow {
    /// The member who paid the settlement.
    pub from_user_id: UserId,
    /// The member who received the payment.
    pub to_user_id: UserId,
    /// The settlement amount (positive).
    pub amount: Decimal,
}

/// A member's computed net balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberBalance {
    /// The member.
    pub user_id: UserId,
    /// Signed net balance: positive = owed money, negative = owes money.
    pub balance: Decimal,
    /// Classification of the balance.
    pub status: BalanceStatus,
}

/// Balances for an entire group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBalances {
    /// Sum of all positive balances: the group's total outstanding debt.
    /// The sum of *signed* balances is always zero by construction.
    pub total_outstanding: Decimal,
    /// Per-member balances, ordered by user id.
    pub members: Vec<MemberBalance>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(BalanceStatus::Receive.as_str(), "receive");
        assert_eq!(BalanceStatus::Pay.as_str(), "pay");
        assert_eq!(BalanceStatus::Settled.as_str(), "settled");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BalanceStatus::Receive).unwrap(),
            "\"receive\""
        );
    }
}
