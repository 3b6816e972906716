//! Split validation for expense creation.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::Split;

/// Validation errors for expense splits.
#[derive(Debug, Error)]
pub enum SplitValidationError {
    /// Split amounts do not add up to the expense total.
    #[error("Split amounts must add up to total: expected {expected}, got {actual}")]
    SumMismatch {
        /// The expense total.
        expected: Decimal,
        /// The sum of the split amounts.
        actual: Decimal,
    },

    /// A split amount is negative.
    #[error("Split amounts must not be negative")]
    NegativeAmount,
}

/// Tolerance for the split-sum check, in currency units.
fn sum_epsilon() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

/// Validates the splits of an expense against its total amount.
///
/// Accepts iff every split amount is non-negative and the split amounts
/// sum to the expense total within a 0.01 tolerance. The tolerance absorbs
/// rounding when an amount does not divide evenly among participants.
///
/// # Errors
///
/// Returns an error if any split is negative or the sum check fails.
pub fn validate_splits(amount: Decimal, splits: &[Split]) -> Result<(), SplitValidationError> {
    let mut sum = Decimal::ZERO;

    for split in splits {
        if split.amount < Decimal::ZERO {
            return Err(SplitValidationError::NegativeAmount);
        }
        sum += split.amount;
    }

    if (sum - amount).abs() > sum_epsilon() {
        return Err(SplitValidationError::SumMismatch {
            expected: amount,
            actual: sum,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use divvy_shared::types::UserId;
    use rust_decimal_macros::dec;

    fn split(amount: Decimal) -> Split {
        Split {
            user_id: UserId::new(),
            amount,
            paid: false,
        }
    }

    #[test]
    fn test_exact_sum_accepted() {
        let splits = vec![split(dec!(30.00)), split(dec!(30.00)), split(dec!(30.00))];
        assert!(validate_splits(dec!(90.00), &splits).is_ok());
    }

    #[test]
    fn test_sum_within_epsilon_accepted() {
        // 33.33 * 3 = 99.99, one cent short of 100.00.
        let splits = vec![split(dec!(33.33)), split(dec!(33.33)), split(dec!(33.33))];
        assert!(validate_splits(dec!(100.00), &splits).is_ok());
    }

    #[test]
    fn test_sum_beyond_epsilon_rejected() {
        let splits = vec![split(dec!(33.33)), split(dec!(33.33)), split(dec!(33.32))];
        let result = validate_splits(dec!(100.00), &splits);
        assert!(matches!(
            result,
            Err(SplitValidationError::SumMismatch {
                expected,
                actual,
            }) if expected == dec!(100.00) && actual == dec!(99.98)
        ));
    }

    #[test]
    fn test_negative_split_rejected() {
        let splits = vec![split(dec!(120.00)), split(dec!(-20.00))];
        assert!(matches!(
            validate_splits(dec!(100.00), &splits),
            Err(SplitValidationError::NegativeAmount)
        ));
    }

    #[test]
    fn test_zero_share_accepted() {
        // A participant can legitimately owe nothing.
        let splits = vec![split(dec!(50.00)), split(dec!(0.00))];
        assert!(validate_splits(dec!(50.00), &splits).is_ok());
    }

    #[test]
    fn test_empty_splits_must_match_zero_total() {
        assert!(validate_splits(dec!(0.00), &[]).is_ok());
        assert!(matches!(
            validate_splits(dec!(10.00), &[]),
            Err(SplitValidationError::SumMismatch { .. })
        ));
    }
}
