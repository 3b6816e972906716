//! Shared-expense ledger logic.
//!
//! This module implements the core balance engine:
//! - Domain types for expenses, splits, and settlements
//! - Split validation at expense creation
//! - Pairwise balance resolution between two users
//! - Aggregate balance resolution across all counterparts

pub mod balance;
pub mod types;
pub mod validation;

#[cfg(test)]
mod balance_props;

pub use balance::{
    BalanceError, BalanceSummary, CounterpartBalance, OweDetails, balance_summary,
    pairwise_balance,
};
pub use types::{Expense, Settlement, Split};
pub use validation::{SplitValidationError, validate_splits};
