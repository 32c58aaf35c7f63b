//! Property-based tests for share allocation.
//!
//! - Share-sum invariant: allocations always sum exactly to the amount
//! - No participant ever receives a negative share
//! - Allocation is deterministic

use proptest::prelude::*;
use rust_decimal::Decimal;

use splitpot_shared::types::UserId;

use super::allocator::allocate_shares;

/// Strategy to generate positive amounts at minor-unit precision
/// (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate participant lists (1 to 50 members).
fn participants() -> impl Strategy<Value = Vec<UserId>> {
    (1usize..50).prop_map(|n| (0..n).map(|_| UserId::new()).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* amount A > 0 and participant list of length N >= 1,
    /// sum(allocate_shares(A, participants)) SHALL equal A exactly.
    #[test]
    fn prop_shares_sum_exactly_to_amount(
        amount in positive_amount(),
        ids in participants(),
    ) {
        let shares = allocate_shares(amount, &ids).unwrap();
        let sum: Decimal = shares.iter().map(|s| s.amount).sum();
        prop_assert_eq!(sum, amount, "Shares must sum exactly to the amount");
    }

    /// *For any* valid input, every share SHALL be non-negative.
    #[test]
    fn prop_no_negative_share(
        amount in positive_amount(),
        ids in participants(),
    ) {
        let shares = allocate_shares(amount, &ids).unwrap();
        for share in &shares {
            prop_assert!(share.amount >= Decimal::ZERO);
        }
    }

    /// *For any* valid input, shares differ by at most one minor unit and
    /// the larger shares come first (leftover cents go to the head of the
    /// list).
    #[test]
    fn prop_shares_are_fair_and_front_loaded(
        amount in positive_amount(),
        ids in participants(),
    ) {
        let shares = allocate_shares(amount, &ids).unwrap();
        let max = shares.iter().map(|s| s.amount).max().unwrap();
        let min = shares.iter().map(|s| s.amount).min().unwrap();
        prop_assert!(max - min <= Decimal::new(1, 2));
        // Non-increasing sequence
        for pair in shares.windows(2) {
            prop_assert!(pair[0].amount >= pair[1].amount);
        }
    }

    /// *For any* valid input, allocation SHALL be deterministic.
    #[test]
    fn prop_allocation_is_deterministic(
        amount in positive_amount(),
        ids in participants(),
    ) {
        let first = allocate_shares(amount, &ids).unwrap();
        let second = allocate_shares(amount, &ids).unwrap();
        prop_assert_eq!(first, second);
    }

    /// *For any* valid input, exactly one allocation is produced per
    /// participant occurrence, in input order.
    #[test]
    fn prop_one_share_per_occurrence(
        amount in positive_amount(),
        ids in participants(),
    ) {
        let shares = allocate_shares(amount, &ids).unwrap();
        prop_assert_eq!(shares.len(), ids.len());
        for (share, id) in shares.iter().zip(ids.iter()) {
            prop_assert_eq!(share.user_id, *id);
        }
    }
}
