//! Pairwise and aggregate balance resolution.
//!
//! Both resolvers are pure folds over expense and settlement records.
//! They hold no state between calls; every invocation recomputes from the
//! records it is handed.

use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;

use divvy_shared::types::UserId;

use super::types::{Expense, Settlement};

/// Errors for balance resolution.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// Pairwise balance queried with the same user on both sides.
    #[error("Cannot compute a balance between a user and themselves")]
    SelfQuery,
}

/// Computes the net balance between two users.
///
/// Positive means `other` owes `me`; negative means `me` owes `other`.
///
/// Expenses where `me` is the payer add `other`'s unpaid share; expenses
/// where `other` is the payer subtract `me`'s unpaid share. Expenses paid
/// by a third party contribute nothing, even when both users share a
/// split: only the payer/splitter relationship carries a balance.
///
/// Settlements from `me` to `other` add their amount, the reverse
/// direction subtracts. Settlements are trusted as recorded; an
/// over-payment flips the sign rather than clamping at zero.
///
/// # Errors
///
/// Returns `BalanceError::SelfQuery` if `me == other`.
pub fn pairwise_balance(
    me: UserId,
    other: UserId,
    expenses: &[Expense],
    settlements: &[Settlement],
) -> Result<Decimal, BalanceError> {
    if me == other {
        return Err(BalanceError::SelfQuery);
    }

    let mut balance = Decimal::ZERO;

    for expense in expenses {
        if expense.paid_by == me {
            if let Some(share) = unpaid_share(expense, other) {
                balance += share;
            }
        } else if expense.paid_by == other {
            if let Some(share) = unpaid_share(expense, me) {
                balance -= share;
            }
        }
    }

    for settlement in settlements {
        if settlement.paid_by == me && settlement.received_by == other {
            balance += settlement.amount;
        } else if settlement.paid_by == other && settlement.received_by == me {
            balance -= settlement.amount;
        }
    }

    Ok(balance)
}

/// A user's split on an expense, if it is still unpaid.
fn unpaid_share(expense: &Expense, user: UserId) -> Option<Decimal> {
    expense
        .splits
        .iter()
        .find(|s| s.user_id == user)
        .filter(|s| !s.paid)
        .map(|s| s.amount)
}

/// One counterpart's outstanding amount in a balance summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterpartBalance {
    /// The counterpart.
    pub user_id: UserId,
    /// The outstanding amount, always positive; the direction is given by
    /// which list the entry appears in.
    pub amount: Decimal,
}

/// Per-counterpart breakdown of a user's position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OweDetails {
    /// Counterparts this user owes money to, largest first.
    pub you_owe: Vec<CounterpartBalance>,
    /// Counterparts that owe this user money, largest first.
    pub you_are_owed_by: Vec<CounterpartBalance>,
}

/// A user's global position across all their expenses and settlements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSummary {
    /// Total this user owes others.
    pub you_owe: Decimal,
    /// Total others owe this user.
    pub you_are_owed: Decimal,
    /// `you_are_owed - you_owe`.
    pub total_balance: Decimal,
    /// Per-counterpart breakdown.
    pub owe_details: OweDetails,
}

/// Running totals against a single counterpart during the aggregate fold.
#[derive(Debug, Default)]
struct Position {
    owed: Decimal,
    owing: Decimal,
}

/// Computes a user's aggregate position over the records touching them.
///
/// For each expense this user paid, every other participant's unpaid
/// share counts toward `you_are_owed`. For each expense someone else
/// paid, this user's own unpaid share counts toward `you_owe`. Settlements
/// this user paid reduce `you_owe`; settlements they received reduce
/// `you_are_owed`. Both totals can go negative when settlements exceed the
/// recorded debt.
///
/// Counterparts whose net position is exactly zero are dropped from the
/// breakdown. Both breakdown lists are ordered by amount descending, then
/// by counterpart id to keep ties stable.
///
/// Records not involving `me` at all are skipped, so callers may pass
/// broader result sets than strictly necessary.
#[must_use]
pub fn balance_summary(
    me: UserId,
    expenses: &[Expense],
    settlements: &[Settlement],
) -> BalanceSummary {
    let mut you_owe = Decimal::ZERO;
    let mut you_are_owed = Decimal::ZERO;
    let mut positions: HashMap<UserId, Position> = HashMap::new();

    for expense in expenses {
        let is_payer = expense.paid_by == me;
        let my_split = expense.splits.iter().find(|s| s.user_id == me);

        if is_payer {
            for split in &expense.splits {
                if split.user_id == me || split.paid {
                    continue;
                }
                you_are_owed += split.amount;
                positions.entry(split.user_id).or_default().owed += split.amount;
            }
        } else if let Some(split) = my_split {
            if !split.paid {
                you_owe += split.amount;
                positions.entry(expense.paid_by).or_default().owing += split.amount;
            }
        }
    }

    for settlement in settlements {
        if settlement.paid_by == me {
            you_owe -= settlement.amount;
            positions.entry(settlement.received_by).or_default().owing -= settlement.amount;
        } else if settlement.received_by == me {
            you_are_owed -= settlement.amount;
            positions.entry(settlement.paid_by).or_default().owed -= settlement.amount;
        }
    }

    let mut owe_list = Vec::new();
    let mut owed_by_list = Vec::new();

    for (user_id, position) in positions {
        let net = position.owed - position.owing;
        if net.is_zero() {
            continue;
        }

        let entry = CounterpartBalance {
            user_id,
            amount: net.abs(),
        };
        if net > Decimal::ZERO {
            owed_by_list.push(entry);
        } else {
            owe_list.push(entry);
        }
    }

    sort_by_amount_desc(&mut owe_list);
    sort_by_amount_desc(&mut owed_by_list);

    BalanceSummary {
        you_owe,
        you_are_owed,
        total_balance: you_are_owed - you_owe,
        owe_details: OweDetails {
            you_owe: owe_list,
            you_are_owed_by: owed_by_list,
        },
    }
}

fn sort_by_amount_desc(entries: &mut [CounterpartBalance]) {
    entries.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.user_id.into_inner().cmp(&b.user_id.into_inner()))
    });
}
