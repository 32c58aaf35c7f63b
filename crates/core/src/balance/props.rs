//! Property-based tests for the balance engine.
//!
//! - Balance zero-sum invariant over arbitrary histories
//! - Settlement offset property
//! - Idempotent recomputation

use proptest::prelude::*;
use rust_decimal::Decimal;

use splitpot_shared::types::UserId;

use super::engine::BalanceEngine;
use super::types::{ExpenseRow, SettlementRow, ShareRow};
use crate::split::allocate_shares;

/// Strategy to generate positive amounts at minor-unit precision.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// A generated group history: members plus raw expense/settlement events
/// expressed as member indexes.
#[derive(Debug, Clone)]
struct History {
    members: Vec<UserId>,
    expenses: Vec<ExpenseRow>,
    settlements: Vec<SettlementRow>,
}

fn history() -> impl Strategy<Value = History> {
    (2usize..8)
        .prop_flat_map(|member_count| {
            let expenses = prop::collection::vec(
                (0..member_count, positive_amount(), 1..=member_count),
                0..10,
            );
            let settlements = prop::collection::vec(
                (0..member_count, 0..member_count, positive_amount()),
                0..10,
            );
            (Just(member_count), expenses, settlements)
        })
        .prop_map(|(member_count, raw_expenses, raw_settlements)| {
            let members: Vec<UserId> = (0..member_count).map(|_| UserId::new()).collect();

            let expenses = raw_expenses
                .into_iter()
                .map(|(payer, amount, participant_count)| {
                    let participants = &members[..participant_count];
                    let shares = allocate_shares(amount, participants)
                        .expect("generated amounts are valid")
                        .into_iter()
                        .map(|share| ShareRow {
                            user_id: share.user_id,
                            amount: share.amount,
                        })
                        .collect();
                    ExpenseRow {
                        payer_id: members[payer],
                        amount,
                        shares,
                    }
                })
                .collect();

            let settlements = raw_settlements
                .into_iter()
                .filter(|(from, to, _)| from != to)
                .map(|(from, to, amount)| SettlementRow {
                    from_user_id: members[from],
                    to_user_id: members[to],
                    amount,
                })
                .collect();

            History {
                members,
                expenses,
                settlements,
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* sequence of expenses and settlements, the signed balances
    /// SHALL sum to exactly zero.
    #[test]
    fn prop_balances_sum_to_zero(h in history()) {
        let result = BalanceEngine::compute(&h.members, &h.expenses, &h.settlements);
        let sum: Decimal = result.members.iter().map(|m| m.balance).sum();
        prop_assert_eq!(sum, Decimal::ZERO, "Signed balances must sum to zero");
    }

    /// *For any* history, total outstanding SHALL equal the sum of the
    /// positive balances (and therefore the magnitude of the negative ones).
    #[test]
    fn prop_total_outstanding_matches_positive_balances(h in history()) {
        let result = BalanceEngine::compute(&h.members, &h.expenses, &h.settlements);
        let positives: Decimal = result
            .members
            .iter()
            .map(|m| m.balance)
            .filter(|b| *b > Decimal::ZERO)
            .sum();
        prop_assert_eq!(result.total_outstanding, positives);
        prop_assert!(result.total_outstanding >= Decimal::ZERO);
    }

    /// *For any* history, recording one extra settlement of X from A to B
    /// SHALL change A's balance by +X, B's by -X, and nobody else's.
    #[test]
    fn prop_settlement_offsets_exactly_two_members(
        h in history(),
        amount in positive_amount(),
    ) {
        let before = BalanceEngine::compute(&h.members, &h.expenses, &h.settlements);

        let from = h.members[0];
        let to = h.members[1];
        let mut settlements = h.settlements.clone();
        settlements.push(SettlementRow {
            from_user_id: from,
            to_user_id: to,
            amount,
        });
        let after = BalanceEngine::compute(&h.members, &h.expenses, &settlements);

        for (old, new) in before.members.iter().zip(after.members.iter()) {
            prop_assert_eq!(old.user_id, new.user_id);
            let expected_delta = if old.user_id == from {
                amount
            } else if old.user_id == to {
                -amount
            } else {
                Decimal::ZERO
            };
            prop_assert_eq!(new.balance - old.balance, expected_delta);
        }
    }

    /// *For any* history, computing balances twice with no intervening
    /// writes SHALL yield identical results.
    #[test]
    fn prop_recomputation_is_idempotent(h in history()) {
        let first = BalanceEngine::compute(&h.members, &h.expenses, &h.settlements);
        let second = BalanceEngine::compute(&h.members, &h.expenses, &h.settlements);
        prop_assert_eq!(first, second);
    }

    /// *For any* history, every member of the group SHALL appear exactly
    /// once in the result, ordered by user id.
    #[test]
    fn prop_every_member_reported_once(h in history()) {
        let result = BalanceEngine::compute(&h.members, &h.expenses, &h.settlements);
        prop_assert_eq!(result.members.len(), h.members.len());
        for member in &h.members {
            prop_assert!(result.members.iter().any(|m| m.user_id == *member));
        }
        for pair in result.members.windows(2) {
            prop_assert!(pair[0].user_id < pair[1].user_id);
        }
    }
}
