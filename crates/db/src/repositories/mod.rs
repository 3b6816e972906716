//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod expense;
pub mod group;
pub mod settlement;
pub mod user;

pub use expense::{CreateExpenseInput, ExpenseError, ExpenseRepository};
pub use group::{CreateGroupInput, GroupRepository};
pub use settlement::{CreateSettlementInput, SettlementError, SettlementRepository};
pub use user::{UpsertUserInput, UserRepository};
