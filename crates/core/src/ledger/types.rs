//! Domain types for the balance engine.
//!
//! These are the engine's view of stored records: just the fields the
//! resolvers compute on. Monetary fields are `Decimal` in a single
//! implicit currency.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use divvy_shared::types::{ExpenseId, SettlementId, UserId};

/// One participant's share of an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// The participant.
    pub user_id: UserId,
    /// This participant's share of the expense total.
    pub amount: Decimal,
    /// True once this share has been settled; paid shares are excluded
    /// from outstanding-balance math.
    pub paid: bool,
}

/// An expense as seen by the resolvers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// The user who fronted the money.
    pub paid_by: UserId,
    /// When the expense occurred.
    pub date: DateTime<Utc>,
    /// Per-participant shares. The payer's own entry, if present, is their
    /// own share and never counts toward what they are owed.
    pub splits: Vec<Split>,
}

/// A recorded payment that cancels debt between two users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Settlement ID.
    pub id: SettlementId,
    /// The user who handed over the money.
    pub paid_by: UserId,
    /// The user who received it.
    pub received_by: UserId,
    /// Amount that changed hands.
    pub amount: Decimal,
    /// When the payment was made.
    pub date: DateTime<Utc>,
}
