//! Equal-split share allocation using the Largest Remainder Method.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

use splitpot_shared::types::{UserId, minor_unit, round_to_minor_units};

use super::error::SplitError;

/// One participant's allocated portion of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareAllocation {
    /// The participant this share belongs to.
    pub user_id: UserId,
    /// The allocated amount (non-negative, minor-unit precision).
    pub amount: Decimal,
}

/// Allocates an expense amount evenly across participants.
///
/// The amount is rounded to minor units, divided by the participant count
/// with the quotient floored to minor units, and the leftover cents are
/// assigned one-by-one to the first participants in input order. The result
/// is deterministic and the shares sum EXACTLY to the (rounded) amount.
///
/// Participant ids are not deduplicated: each occurrence in the input
/// receives its own allocation. Callers that require one share per user must
/// enforce uniqueness themselves.
///
/// # Errors
///
/// Returns `SplitError::InvalidAmount` if the amount is not positive (or
/// rounds to zero at minor-unit precision), and `SplitError::NoParticipants`
/// if the participant list is empty.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use splitpot_core::split::allocate_shares;
/// use splitpot_shared::types::UserId;
///
/// // 100 / 3 = [33.34, 33.33, 33.33], sum = 100.00
/// let participants = vec![UserId::new(), UserId::new(), UserId::new()];
/// let shares = allocate_shares(dec!(100), &participants).unwrap();
/// assert_eq!(shares.iter().map(|s| s.amount).sum::<rust_decimal::Decimal>(), dec!(100));
/// ```
pub fn allocate_shares(
    amount: Decimal,
    participant_ids: &[UserId],
) -> Result<Vec<ShareAllocation>, SplitError> {
    if amount <= Decimal::ZERO {
        return Err(SplitError::InvalidAmount);
    }
    if participant_ids.is_empty() {
        return Err(SplitError::NoParticipants);
    }

    let total = round_to_minor_units(amount);
    if total <= Decimal::ZERO {
        // Sub-cent amounts round away to nothing and cannot be split.
        return Err(SplitError::InvalidAmount);
    }

    let count = Decimal::from(participant_ids.len() as u64);
    let unit = minor_unit();

    // Floor the per-head quotient to get the base share
    let base = (total / count)
        .round_dp_with_strategy(unit.scale(), RoundingStrategy::ToZero);

    // Leftover cents after everyone got the base share
    let remainder = total - base * count;
    let extra_count = (remainder / unit)
        .round_dp_with_strategy(0, RoundingStrategy::ToZero)
        .to_u64()
        .unwrap_or(0);
    let extra_count = usize::try_from(extra_count).unwrap_or(0);

    // First `extra_count` participants (input order) each absorb one cent
    Ok(participant_ids
        .iter()
        .enumerate()
        .map(|(i, user_id)| ShareAllocation {
            user_id: *user_id,
            amount: if i < extra_count { base + unit } else { base },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn users(n: usize) -> Vec<UserId> {
        (0..n).map(|_| UserId::new()).collect()
    }

    fn total(shares: &[ShareAllocation]) -> Decimal {
        shares.iter().map(|s| s.amount).sum()
    }

    #[test]
    fn test_even_split() {
        let participants = users(2);
        let shares = allocate_shares(dec!(100), &participants).unwrap();
        assert_eq!(shares[0].amount, dec!(50));
        assert_eq!(shares[1].amount, dec!(50));
        assert_eq!(total(&shares), dec!(100));
    }

    #[test]
    fn test_thirds_first_participant_gets_extra_cent() {
        let participants = users(3);
        let shares = allocate_shares(dec!(100), &participants).unwrap();
        assert_eq!(shares[0].amount, dec!(33.34));
        assert_eq!(shares[1].amount, dec!(33.33));
        assert_eq!(shares[2].amount, dec!(33.33));
        assert_eq!(total(&shares), dec!(100));
    }

    #[test]
    fn test_single_participant_gets_everything() {
        let participants = users(1);
        let shares = allocate_shares(dec!(42.37), &participants).unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].amount, dec!(42.37));
    }

    #[test]
    fn test_shares_follow_input_order() {
        let participants = users(3);
        let shares = allocate_shares(dec!(0.04), &participants).unwrap();
        // 0.04 / 3 → base 0.01, one leftover cent to the first participant
        assert_eq!(shares[0].user_id, participants[0]);
        assert_eq!(shares[0].amount, dec!(0.02));
        assert_eq!(shares[1].amount, dec!(0.01));
        assert_eq!(shares[2].amount, dec!(0.01));
    }

    #[test]
    fn test_one_cent_among_three() {
        let participants = users(3);
        let shares = allocate_shares(dec!(0.01), &participants).unwrap();
        assert_eq!(shares[0].amount, dec!(0.01));
        assert_eq!(shares[1].amount, dec!(0));
        assert_eq!(shares[2].amount, dec!(0));
        assert_eq!(total(&shares), dec!(0.01));
    }

    #[test]
    fn test_duplicate_participants_each_get_a_share() {
        let user = UserId::new();
        let participants = vec![user, user];
        let shares = allocate_shares(dec!(10), &participants).unwrap();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].user_id, user);
        assert_eq!(shares[1].user_id, user);
        assert_eq!(total(&shares), dec!(10));
    }

    #[test]
    fn test_sub_cent_amount_rounds_first() {
        let participants = users(3);
        let shares = allocate_shares(dec!(99.999), &participants).unwrap();
        assert_eq!(total(&shares), dec!(100));
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert_eq!(
            allocate_shares(dec!(0), &users(1)),
            Err(SplitError::InvalidAmount)
        );
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert_eq!(
            allocate_shares(dec!(-50), &users(2)),
            Err(SplitError::InvalidAmount)
        );
    }

    #[test]
    fn test_vanishing_amount_rejected() {
        assert_eq!(
            allocate_shares(dec!(0.004), &users(2)),
            Err(SplitError::InvalidAmount)
        );
    }

    #[test]
    fn test_empty_participants_rejected() {
        assert_eq!(
            allocate_shares(dec!(50), &[]),
            Err(SplitError::NoParticipants)
        );
    }

    #[test]
    fn test_sum_invariant_examples() {
        let test_cases = [
            (dec!(100), 3),
            (dec!(100), 7),
            (dec!(1000), 3),
            (dec!(1), 3),
            (dec!(0.01), 3),
            (dec!(999.99), 7),
        ];

        for (amount, count) in test_cases {
            let participants = users(count);
            let shares = allocate_shares(amount, &participants).unwrap();
            assert_eq!(
                total(&shares),
                amount,
                "Sum invariant failed for amount={amount}, count={count}"
            );
            assert!(shares.iter().all(|s| s.amount >= Decimal::ZERO));
        }
    }
}
