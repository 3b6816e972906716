//! Property-based tests for balance resolution.
//!
//! Covers the algebra both resolvers must share: pairwise antisymmetry,
//! exact settlement offsets, paid-split exclusion, and agreement between
//! the aggregate summary and the pairwise fold.

use std::collections::HashMap;

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use divvy_shared::types::{ExpenseId, SettlementId, UserId};

use super::balance::{balance_summary, pairwise_balance};
use super::types::{Expense, Settlement, Split};

/// Size of the fixed user pool all generated records draw from.
const POOL: usize = 4;

/// The nth pool user, with a stable id so ties sort deterministically.
fn pool_user(n: usize) -> UserId {
    UserId::from_uuid(Uuid::from_u128(n as u128 + 1))
}

/// Strategy to generate positive decimal amounts (0.01 to 1,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate an index into the user pool.
fn pool_index() -> impl Strategy<Value = usize> {
    0usize..POOL
}

/// Strategy to generate one expense.
///
/// Each pool user is independently included in the split list at most
/// once, so per-user shares are unambiguous.
fn expense_strategy() -> impl Strategy<Value = Expense> {
    (
        pool_index(),
        proptest::collection::vec((any::<bool>(), positive_amount(), any::<bool>()), POOL),
    )
        .prop_map(|(payer, participation)| Expense {
            id: ExpenseId::new(),
            paid_by: pool_user(payer),
            date: Utc::now(),
            splits: participation
                .iter()
                .enumerate()
                .filter(|(_, (included, _, _))| *included)
                .map(|(i, &(_, amount, paid))| Split {
                    user_id: pool_user(i),
                    amount,
                    paid,
                })
                .collect(),
        })
}

/// Strategy to generate a batch of expenses.
fn expenses_strategy() -> impl Strategy<Value = Vec<Expense>> {
    proptest::collection::vec(expense_strategy(), 0..6)
}

/// Strategy to generate one settlement between two distinct pool users.
fn settlement_strategy() -> impl Strategy<Value = Settlement> {
    (pool_index(), 1usize..POOL, positive_amount()).prop_map(|(payer, offset, amount)| {
        Settlement {
            id: SettlementId::new(),
            paid_by: pool_user(payer),
            received_by: pool_user((payer + offset) % POOL),
            amount,
            date: Utc::now(),
        }
    })
}

/// Strategy to generate a batch of settlements.
fn settlements_strategy() -> impl Strategy<Value = Vec<Settlement>> {
    proptest::collection::vec(settlement_strategy(), 0..4)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* record set and any two distinct users, the pairwise
    /// balance seen from one side is the exact negation of the other.
    #[test]
    fn prop_pairwise_antisymmetric(
        expenses in expenses_strategy(),
        settlements in settlements_strategy(),
        a in pool_index(),
        offset in 1usize..POOL,
    ) {
        let me = pool_user(a);
        let other = pool_user((a + offset) % POOL);

        let forward = pairwise_balance(me, other, &expenses, &settlements).unwrap();
        let backward = pairwise_balance(other, me, &expenses, &settlements).unwrap();
        prop_assert_eq!(forward, -backward);
    }

    /// *For any* expense set, settling the exact outstanding amount
    /// drives the pairwise balance to zero.
    #[test]
    fn prop_exact_settlement_zeroes_balance(
        expenses in expenses_strategy(),
        a in pool_index(),
        offset in 1usize..POOL,
    ) {
        let me = pool_user(a);
        let other = pool_user((a + offset) % POOL);

        let owed = pairwise_balance(me, other, &expenses, &[]).unwrap();
        // Positive means other owes me, so other pays; negative means I pay.
        let settlements = if owed.is_zero() {
            vec![]
        } else if owed > Decimal::ZERO {
            vec![Settlement {
                id: SettlementId::new(),
                paid_by: other,
                received_by: me,
                amount: owed,
                date: Utc::now(),
            }]
        } else {
            vec![Settlement {
                id: SettlementId::new(),
                paid_by: me,
                received_by: other,
                amount: -owed,
                date: Utc::now(),
            }]
        };

        let settled = pairwise_balance(me, other, &expenses, &settlements).unwrap();
        prop_assert_eq!(settled, Decimal::ZERO);
    }

    /// *For any* expense set where every split is already marked paid,
    /// no debt exists in either resolver.
    #[test]
    fn prop_paid_splits_never_contribute(
        expenses in expenses_strategy(),
        a in pool_index(),
        offset in 1usize..POOL,
    ) {
        let me = pool_user(a);
        let other = pool_user((a + offset) % POOL);

        let all_paid: Vec<Expense> = expenses
            .into_iter()
            .map(|mut e| {
                for split in &mut e.splits {
                    split.paid = true;
                }
                e
            })
            .collect();

        prop_assert_eq!(pairwise_balance(me, other, &all_paid, &[]).unwrap(), Decimal::ZERO);

        let summary = balance_summary(me, &all_paid, &[]);
        prop_assert_eq!(summary.you_owe, Decimal::ZERO);
        prop_assert_eq!(summary.you_are_owed, Decimal::ZERO);
        prop_assert!(summary.owe_details.you_owe.is_empty());
        prop_assert!(summary.owe_details.you_are_owed_by.is_empty());
    }

    /// *For any* record set, the summary's totals reconcile with its own
    /// breakdown: the breakdown nets to the total balance, carries no
    /// zero entries, and is sorted largest first.
    #[test]
    fn prop_summary_internally_consistent(
        expenses in expenses_strategy(),
        settlements in settlements_strategy(),
        a in pool_index(),
    ) {
        let me = pool_user(a);
        let summary = balance_summary(me, &expenses, &settlements);

        prop_assert_eq!(
            summary.total_balance,
            summary.you_are_owed - summary.you_owe
        );

        let owed_by_sum: Decimal = summary
            .owe_details
            .you_are_owed_by
            .iter()
            .map(|e| e.amount)
            .sum();
        let owe_sum: Decimal = summary.owe_details.you_owe.iter().map(|e| e.amount).sum();
        prop_assert_eq!(owed_by_sum - owe_sum, summary.total_balance);

        for list in [&summary.owe_details.you_owe, &summary.owe_details.you_are_owed_by] {
            for entry in list {
                prop_assert!(entry.amount > Decimal::ZERO);
            }
            for pair in list.windows(2) {
                prop_assert!(pair[0].amount >= pair[1].amount);
            }
        }
    }

    /// *For any* record set, each counterpart's net position in the
    /// summary equals the pairwise balance against that counterpart.
    #[test]
    fn prop_summary_agrees_with_pairwise(
        expenses in expenses_strategy(),
        settlements in settlements_strategy(),
        a in pool_index(),
    ) {
        let me = pool_user(a);
        let summary = balance_summary(me, &expenses, &settlements);

        let mut nets: HashMap<UserId, Decimal> = HashMap::new();
        for entry in &summary.owe_details.you_are_owed_by {
            nets.insert(entry.user_id, entry.amount);
        }
        for entry in &summary.owe_details.you_owe {
            nets.insert(entry.user_id, -entry.amount);
        }

        for n in 0..POOL {
            if n == a {
                continue;
            }
            let other = pool_user(n);
            let expected = nets.get(&other).copied().unwrap_or(Decimal::ZERO);
            let pairwise = pairwise_balance(me, other, &expenses, &settlements).unwrap();
            prop_assert_eq!(pairwise, expected);
        }
    }
}
