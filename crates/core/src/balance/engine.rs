//! The balance engine: folds expense and settlement history into balances.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use splitpot_shared::types::{UserId, minor_unit};

use super::types::{
    BalanceStatus, ExpenseRow, GroupBalances, MemberBalance, SettlementRow,
};

/// Returns the epsilon inside which a balance counts as settled (0.01).
///
/// A balance of exactly one minor unit is still real money and classifies
/// as pay/receive; only strictly smaller magnitudes absorb into settled.
#[must_use]
pub fn settled_epsilon() -> Decimal {
    minor_unit()
}

/// Pure balance computation over a group's full history.
///
/// The engine never mutates state and never fails: malformed references
/// (unknown groups, missing rows) are the storage layer's concern and are
/// rejected before the engine runs.
pub struct BalanceEngine;

impl BalanceEngine {
    /// Computes per-member net balances from full group history.
    ///
    /// Per expense the payer is credited the full amount once and every
    /// share row debits its user (a payer participating in their own
    /// expense nets to `amount - own_share`). Per settlement the from-user
    /// is credited (debt discharged) and the to-user debited (payment
    /// received). Fixed-point decimal addition makes the result independent
    /// of summation order.
    ///
    /// Every id in `member_ids` appears in the result, as do users that
    /// occur in history but have since left the group; without the latter
    /// the zero-sum invariant would not hold.
    #[must_use]
    pub fn compute(
        member_ids: &[UserId],
        expenses: &[ExpenseRow],
        settlements: &[SettlementRow],
    ) -> GroupBalances {
        let mut balances: BTreeMap<UserId, Decimal> = member_ids
            .iter()
            .map(|id| (*id, Decimal::ZERO))
            .collect();

        for expense in expenses {
            *balances.entry(expense.payer_id).or_default() += expense.amount;
            for share in &expense.shares {
                *balances.entry(share.user_id).or_default() -= share.amount;
            }
        }

        for settlement in settlements {
            *balances.entry(settlement.from_user_id).or_default() += settlement.amount;
            *balances.entry(settlement.to_user_id).or_default() -= settlement.amount;
        }

        let total_outstanding = balances
            .values()
            .filter(|balance| **balance > Decimal::ZERO)
            .sum();

        let members = balances
            .into_iter()
            .map(|(user_id, balance)| MemberBalance {
                user_id,
                balance,
                status: Self::classify(balance),
            })
            .collect();

        GroupBalances {
            total_outstanding,
            members,
        }
    }

    /// Classifies a signed balance.
    #[must_use]
    pub fn classify(balance: Decimal) -> BalanceStatus {
        if balance.abs() < settled_epsilon() {
            BalanceStatus::Settled
        } else if balance > Decimal::ZERO {
            BalanceStatus::Receive
        } else {
            BalanceStatus::Pay
        }
    }

    /// Suggests the primary creditor a debtor should pay: the member with
    /// the largest positive balance (ties resolve to the lowest user id).
    ///
    /// This is a presentation heuristic, not a min-cash-flow matching; it
    /// ignores that settling multiple creditors may need split payments.
    #[must_use]
    pub fn suggest_creditor(members: &[MemberBalance]) -> Option<UserId> {
        let mut best: Option<&MemberBalance> = None;
        for candidate in members.iter().filter(|m| m.balance > Decimal::ZERO) {
            let better = best.is_none_or(|current| {
                candidate.balance > current.balance
                    || (candidate.balance == current.balance
                        && candidate.user_id < current.user_id)
            });
            if better {
                best = Some(candidate);
            }
        }
        best.map(|member| member.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::balance::types::ShareRow;

    fn users(n: usize) -> Vec<UserId> {
        let mut ids: Vec<UserId> = (0..n).map(|_| UserId::new()).collect();
        ids.sort();
        ids
    }

    fn equal_thirds_expense(payer: UserId, participants: &[UserId]) -> ExpenseRow {
        ExpenseRow {
            payer_id: payer,
            amount: dec!(100),
            shares: vec![
                ShareRow {
                    user_id: participants[0],
                    amount: dec!(33.34),
                },
                ShareRow {
                    user_id: participants[1],
                    amount: dec!(33.33),
                },
                ShareRow {
                    user_id: participants[2],
                    amount: dec!(33.33),
                },
            ],
        }
    }

    fn balance_of(result: &GroupBalances, user: UserId) -> &MemberBalance {
        result
            .members
            .iter()
            .find(|m| m.user_id == user)
            .expect("member missing from result")
    }

    #[test]
    fn test_expense_split_among_three() {
        // 100.00 split [33.34, 33.33, 33.33], paid by the first member
        let members = users(3);
        let expenses = vec![equal_thirds_expense(members[0], &members)];

        let result = BalanceEngine::compute(&members, &expenses, &[]);

        assert_eq!(balance_of(&result, members[0]).balance, dec!(66.66));
        assert_eq!(
            balance_of(&result, members[0]).status,
            BalanceStatus::Receive
        );
        assert_eq!(balance_of(&result, members[1]).balance, dec!(-33.33));
        assert_eq!(balance_of(&result, members[1]).status, BalanceStatus::Pay);
        assert_eq!(balance_of(&result, members[2]).balance, dec!(-33.33));
        assert_eq!(result.total_outstanding, dec!(66.66));
    }

    #[test]
    fn test_settlement_offsets_balances() {
        // Same group; the second member settles 33.33 to the payer
        let members = users(3);
        let expenses = vec![equal_thirds_expense(members[0], &members)];
        let settlements = vec![SettlementRow {
            from_user_id: members[1],
            to_user_id: members[0],
            amount: dec!(33.33),
        }];

        let result = BalanceEngine::compute(&members, &expenses, &settlements);

        assert_eq!(balance_of(&result, members[0]).balance, dec!(33.33));
        assert_eq!(
            balance_of(&result, members[0]).status,
            BalanceStatus::Receive
        );
        assert_eq!(balance_of(&result, members[1]).balance, dec!(0));
        assert_eq!(
            balance_of(&result, members[1]).status,
            BalanceStatus::Settled
        );
        // The third member is untouched by the settlement
        assert_eq!(balance_of(&result, members[2]).balance, dec!(-33.33));
    }

    #[test]
    fn test_payer_in_own_shares_nets_out() {
        let members = users(2);
        let expenses = vec![ExpenseRow {
            payer_id: members[0],
            amount: dec!(50),
            shares: vec![
                ShareRow {
                    user_id: members[0],
                    amount: dec!(25),
                },
                ShareRow {
                    user_id: members[1],
                    amount: dec!(25),
                },
            ],
        }];

        let result = BalanceEngine::compute(&members, &expenses, &[]);

        assert_eq!(balance_of(&result, members[0]).balance, dec!(25));
        assert_eq!(balance_of(&result, members[1]).balance, dec!(-25));
    }

    #[test]
    fn test_empty_history_all_settled() {
        let members = users(3);
        let result = BalanceEngine::compute(&members, &[], &[]);

        assert_eq!(result.members.len(), 3);
        assert_eq!(result.total_outstanding, dec!(0));
        for member in &result.members {
            assert_eq!(member.balance, dec!(0));
            assert_eq!(member.status, BalanceStatus::Settled);
        }
    }

    #[test]
    fn test_departed_member_still_counted() {
        // A user appears in history but is no longer in the member list;
        // dropping them would break the zero-sum.
        let members = users(2);
        let departed = UserId::new();
        let expenses = vec![ExpenseRow {
            payer_id: members[0],
            amount: dec!(30),
            shares: vec![
                ShareRow {
                    user_id: members[1],
                    amount: dec!(15),
                },
                ShareRow {
                    user_id: departed,
                    amount: dec!(15),
                },
            ],
        }];

        let result = BalanceEngine::compute(&members, &expenses, &[]);

        assert_eq!(result.members.len(), 3);
        assert_eq!(balance_of(&result, departed).balance, dec!(-15));
        let sum: Decimal = result.members.iter().map(|m| m.balance).sum();
        assert_eq!(sum, dec!(0));
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let members = users(3);
        let expenses = vec![equal_thirds_expense(members[0], &members)];
        let settlements = vec![SettlementRow {
            from_user_id: members[2],
            to_user_id: members[0],
            amount: dec!(10),
        }];

        let first = BalanceEngine::compute(&members, &expenses, &settlements);
        let second = BalanceEngine::compute(&members, &expenses, &settlements);
        assert_eq!(first, second);
    }

    #[test]
    fn test_overpaying_settlement_flips_direction() {
        // Over-payment is allowed: the debtor becomes a creditor.
        let members = users(2);
        let expenses = vec![ExpenseRow {
            payer_id: members[0],
            amount: dec!(10),
            shares: vec![ShareRow {
                user_id: members[1],
                amount: dec!(10),
            }],
        }];
        let settlements = vec![SettlementRow {
            from_user_id: members[1],
            to_user_id: members[0],
            amount: dec!(25),
        }];

        let result = BalanceEngine::compute(&members, &expenses, &settlements);

        assert_eq!(balance_of(&result, members[0]).balance, dec!(-15));
        assert_eq!(balance_of(&result, members[1]).balance, dec!(15));
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(BalanceEngine::classify(dec!(0)), BalanceStatus::Settled);
        assert_eq!(BalanceEngine::classify(dec!(0.009)), BalanceStatus::Settled);
        assert_eq!(
            BalanceEngine::classify(dec!(-0.009)),
            BalanceStatus::Settled
        );
        assert_eq!(BalanceEngine::classify(dec!(0.01)), BalanceStatus::Receive);
        assert_eq!(BalanceEngine::classify(dec!(-0.01)), BalanceStatus::Pay);
    }

    #[test]
    fn test_suggest_creditor_picks_largest() {
        let members = users(3);
        let balances = vec![
            MemberBalance {
                user_id: members[0],
                balance: dec!(20),
                status: BalanceStatus::Receive,
            },
            MemberBalance {
                user_id: members[1],
                balance: dec!(50),
                status: BalanceStatus::Receive,
            },
            MemberBalance {
                user_id: members[2],
                balance: dec!(-70),
                status: BalanceStatus::Pay,
            },
        ];

        assert_eq!(BalanceEngine::suggest_creditor(&balances), Some(members[1]));
    }

    #[test]
    fn test_suggest_creditor_tie_breaks_on_lowest_id() {
        let members = users(2);
        let balances = vec![
            MemberBalance {
                user_id: members[1],
                balance: dec!(25),
                status: BalanceStatus::Receive,
            },
            MemberBalance {
                user_id: members[0],
                balance: dec!(25),
                status: BalanceStatus::Receive,
            },
        ];

        assert_eq!(BalanceEngine::suggest_creditor(&balances), Some(members[0]));
    }

    #[test]
    fn test_suggest_creditor_none_when_all_settled() {
        let balances = vec![MemberBalance {
            user_id: UserId::new(),
            balance: dec!(0),
            status: BalanceStatus::Settled,
        }];

        assert_eq!(BalanceEngine::suggest_creditor(&balances), None);
    }
}
