//! Personal spending aggregation.
//!
//! Spending measures what a user consumed, not what they fronted: an
//! expense counts for the user's own split amount, whether or not that
//! split has been paid back, and paying for an expense without holding a
//! split contributes nothing.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::Decimal;

use divvy_shared::types::UserId;

use crate::ledger::Expense;

/// Spending total for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySpending {
    /// Midnight UTC on the first day of the month.
    pub month: DateTime<Utc>,
    /// The user's own share across expenses dated in this month.
    pub total: Decimal,
}

/// Buckets a user's own shares into the twelve months of `year`.
///
/// Always returns one bucket per month, January through December, with
/// months that saw no spending at zero. Expenses dated outside `year`
/// are ignored even when the caller passes them in. Month boundaries are
/// evaluated in UTC.
#[must_use]
pub fn monthly_spending(user: UserId, year: i32, expenses: &[Expense]) -> Vec<MonthlySpending> {
    let mut totals = [Decimal::ZERO; 12];

    for expense in expenses {
        if expense.date.year() != year {
            continue;
        }
        if let Some(share) = own_share(expense, user) {
            totals[expense.date.month0() as usize] += share;
        }
    }

    (1..=12u32)
        .filter_map(|month_number| {
            let month = month_start(year, month_number)?;
            Some(MonthlySpending {
                month,
                total: totals[(month_number - 1) as usize],
            })
        })
        .collect()
}

/// Sums a user's own shares across expenses dated in `year`.
#[must_use]
pub fn total_spent(user: UserId, year: i32, expenses: &[Expense]) -> Decimal {
    expenses
        .iter()
        .filter(|e| e.date.year() == year)
        .filter_map(|e| own_share(e, user))
        .sum()
}

/// The user's split amount on an expense, paid or not.
fn own_share(expense: &Expense, user: UserId) -> Option<Decimal> {
    expense
        .splits
        .iter()
        .find(|s| s.user_id == user)
        .map(|s| s.amount)
}

/// Midnight UTC at the start of the given month.
///
/// `None` only for years outside chrono's representable range.
fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Split;
    use divvy_shared::types::ExpenseId;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn uid(n: u128) -> UserId {
        UserId::from_uuid(Uuid::from_u128(n))
    }

    fn dated_expense(
        paid_by: UserId,
        date: DateTime<Utc>,
        splits: &[(UserId, Decimal, bool)],
    ) -> Expense {
        Expense {
            id: ExpenseId::new(),
            paid_by,
            date,
            splits: splits
                .iter()
                .map(|&(user_id, amount, paid)| Split {
                    user_id,
                    amount,
                    paid,
                })
                .collect(),
        }
    }

    fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).single().unwrap()
    }

    #[test]
    fn test_empty_year_still_has_twelve_buckets() {
        let months = monthly_spending(uid(1), 2026, &[]);

        assert_eq!(months.len(), 12);
        assert!(months.iter().all(|m| m.total == dec!(0)));
        assert_eq!(months[0].month, month_start(2026, 1).unwrap());
        assert_eq!(months[11].month, month_start(2026, 12).unwrap());
    }

    #[test]
    fn test_expense_lands_in_its_month() {
        let a = uid(1);
        let expenses = [
            dated_expense(a, utc(2026, 3, 14), &[(a, dec!(25.00), true)]),
            dated_expense(a, utc(2026, 3, 20), &[(a, dec!(10.00), true)]),
            dated_expense(a, utc(2026, 11, 2), &[(a, dec!(5.00), true)]),
        ];

        let months = monthly_spending(a, 2026, &expenses);
        assert_eq!(months[2].total, dec!(35.00));
        assert_eq!(months[10].total, dec!(5.00));
        assert_eq!(months[0].total, dec!(0));
    }

    #[test]
    fn test_other_years_excluded() {
        let a = uid(1);
        let expenses = [
            dated_expense(a, utc(2025, 12, 31), &[(a, dec!(99.00), true)]),
            dated_expense(a, utc(2027, 1, 1), &[(a, dec!(99.00), true)]),
            dated_expense(a, utc(2026, 6, 1), &[(a, dec!(40.00), true)]),
        ];

        let months = monthly_spending(a, 2026, &expenses);
        let sum: Decimal = months.iter().map(|m| m.total).sum();
        assert_eq!(sum, dec!(40.00));
        assert_eq!(total_spent(a, 2026, &expenses), dec!(40.00));
    }

    #[test]
    fn test_own_share_counts_not_full_amount() {
        // a paid 90.00 but consumed only their 30.00 share.
        let (a, b) = (uid(1), uid(2));
        let expenses = [dated_expense(
            a,
            utc(2026, 5, 10),
            &[(a, dec!(30.00), true), (b, dec!(60.00), false)],
        )];

        assert_eq!(total_spent(a, 2026, &expenses), dec!(30.00));
        assert_eq!(total_spent(b, 2026, &expenses), dec!(60.00));
    }

    #[test]
    fn test_payer_without_split_spends_nothing() {
        let (a, b) = (uid(1), uid(2));
        let expenses = [dated_expense(a, utc(2026, 5, 10), &[(b, dec!(50.00), false)])];

        assert_eq!(total_spent(a, 2026, &expenses), dec!(0));
        let months = monthly_spending(a, 2026, &expenses);
        assert!(months.iter().all(|m| m.total == dec!(0)));
    }

    #[test]
    fn test_unpaid_share_still_counts_as_spending() {
        let (a, b) = (uid(1), uid(2));
        let expenses = [dated_expense(
            b,
            utc(2026, 8, 1),
            &[(a, dec!(12.50), false), (b, dec!(12.50), true)],
        )];

        // a has not paid b back yet, yet the share is already spending.
        assert_eq!(total_spent(a, 2026, &expenses), dec!(12.50));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// *For any* expense set, the twelve monthly buckets sum to the
        /// yearly total.
        #[test]
        fn prop_monthly_buckets_sum_to_total(
            entries in prop::collection::vec(
                (1u32..=12, 1u32..=28, 1i64..100_000i64, any::<bool>()),
                0..20,
            ),
        ) {
            let a = uid(1);
            let expenses: Vec<Expense> = entries
                .iter()
                .map(|&(month, day, cents, paid)| {
                    dated_expense(a, utc(2026, month, day), &[(a, Decimal::new(cents, 2), paid)])
                })
                .collect();

            let months = monthly_spending(a, 2026, &expenses);
            prop_assert_eq!(months.len(), 12);

            let bucket_sum: Decimal = months.iter().map(|m| m.total).sum();
            prop_assert_eq!(bucket_sum, total_spent(a, 2026, &expenses));
        }
    }
}
