//! Expense repository for database operations.
//!
//! Creation runs the split validator before insert, so no caller can put
//! an expense in the store that violates the split-sum invariant.
//! Deletion runs the settlement-pruning cascade inside one database
//! transaction.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use divvy_core::ledger::{self, SplitValidationError, validate_splits};
use divvy_shared::types::{ExpenseId, GroupId, UserId};

use crate::entities::{
    expenses::{self, SplitRecord, SplitsJson},
    groups,
    sea_orm_active_enums::SplitType,
    settlements::{self, RelatedExpenseIdsJson},
};

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Expense not found.
    #[error("Expense not found: {0}")]
    NotFound(Uuid),

    /// Group not found.
    #[error("Group not found: {0}")]
    GroupNotFound(Uuid),

    /// Acting user is not a member of the target group.
    #[error("You are not a member of this group")]
    NotGroupMember,

    /// Expense amount must be positive.
    #[error("Expense amount must be positive")]
    NonPositiveAmount,

    /// Split amounts failed validation.
    #[error(transparent)]
    InvalidSplits(#[from] SplitValidationError),

    /// Only the creator or the payer may delete an expense.
    #[error("Not authorized to delete this expense")]
    DeleteForbidden,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// What the expense was for.
    pub description: String,
    /// Total amount paid.
    pub amount: Decimal,
    /// Category; empty or absent defaults to `Other`.
    pub category: Option<String>,
    /// When the expense happened.
    pub date: DateTime<Utc>,
    /// Who fronted the money.
    pub paid_by_user_id: UserId,
    /// How the split was derived (informational).
    pub split_type: SplitType,
    /// Per-participant shares; must sum to `amount` within the epsilon.
    pub splits: Vec<SplitRecord>,
    /// Group this expense belongs to, if any.
    pub group_id: Option<GroupId>,
    /// Acting user recording the expense.
    pub created_by: UserId,
}

/// Containment probe matching expenses where `user_id` holds a split.
fn split_holder_probe(user_id: Uuid) -> SimpleExpr {
    Expr::cust_with_values("splits @> ?", [json!([{ "user_id": user_id }])])
}

/// Containment probe matching settlements that reference `expense_id`.
fn related_probe(expense_id: Uuid) -> SimpleExpr {
    Expr::cust_with_values("related_expense_ids @> ?", [json!([expense_id])])
}

/// Expense repository for creation, gathering, and cascade deletion.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an expense after validating its splits and, for group
    /// expenses, the acting user's membership.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive, the splits do not
    /// sum to the amount, the group is missing or does not include the
    /// acting user, or the database insert fails.
    pub async fn create(&self, input: CreateExpenseInput) -> Result<expenses::Model, ExpenseError> {
        if input.amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount);
        }

        let ledger_splits: Vec<ledger::Split> = input
            .splits
            .iter()
            .map(|s| ledger::Split {
                user_id: UserId::from_uuid(s.user_id),
                amount: s.amount,
                paid: s.paid,
            })
            .collect();
        validate_splits(input.amount, &ledger_splits)?;

        if let Some(group_id) = input.group_id {
            let group = groups::Entity::find_by_id(group_id.into_inner())
                .one(&self.db)
                .await?
                .ok_or(ExpenseError::GroupNotFound(group_id.into_inner()))?;
            if !group.has_member(input.created_by.into_inner()) {
                return Err(ExpenseError::NotGroupMember);
            }
        }

        let category = input
            .category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "Other".to_string());

        let expense = expenses::ActiveModel {
            id: Set(ExpenseId::new().into_inner()),
            description: Set(input.description),
            amount: Set(input.amount),
            category: Set(category),
            date: Set(input.date.into()),
            paid_by_user_id: Set(input.paid_by_user_id.into_inner()),
            split_type: Set(input.split_type),
            splits: Set(SplitsJson(input.splits)),
            group_id: Set(input.group_id.map(GroupId::into_inner)),
            created_by: Set(input.created_by.into_inner()),
            created_at: Set(Utc::now().into()),
        };

        Ok(expense.insert(&self.db).await?)
    }

    /// Finds an expense by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: ExpenseId) -> Result<Option<expenses::Model>, DbErr> {
        expenses::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Gathers the expenses relevant to the pair `(a, b)`, newest first:
    /// those paid by either user, plus group expenses where both hold a
    /// split.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_between_users(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<Vec<expenses::Model>, DbErr> {
        let a = a.into_inner();
        let b = b.into_inner();

        expenses::Entity::find()
            .filter(
                Condition::any()
                    .add(expenses::Column::PaidByUserId.eq(a))
                    .add(expenses::Column::PaidByUserId.eq(b))
                    .add(
                        Condition::all()
                            .add(expenses::Column::GroupId.is_not_null())
                            .add(split_holder_probe(a))
                            .add(split_holder_probe(b)),
                    ),
            )
            .order_by_desc(expenses::Column::Date)
            .all(&self.db)
            .await
    }

    /// Lists every expense touching a user, as payer or split holder.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_touching(&self, user_id: UserId) -> Result<Vec<expenses::Model>, DbErr> {
        let user = user_id.into_inner();

        expenses::Entity::find()
            .filter(
                Condition::any()
                    .add(expenses::Column::PaidByUserId.eq(user))
                    .add(split_holder_probe(user)),
            )
            .all(&self.db)
            .await
    }

    /// Lists the expenses touching a user that are dated within `year`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_year(
        &self,
        user_id: UserId,
        year: i32,
    ) -> Result<Vec<expenses::Model>, DbErr> {
        let (Some(start), Some(end)) = (year_start(year), year_start(year + 1)) else {
            return Ok(Vec::new());
        };
        let user = user_id.into_inner();

        expenses::Entity::find()
            .filter(expenses::Column::Date.gte(start))
            .filter(expenses::Column::Date.lt(end))
            .filter(
                Condition::any()
                    .add(expenses::Column::PaidByUserId.eq(user))
                    .add(split_holder_probe(user)),
            )
            .order_by_asc(expenses::Column::Date)
            .all(&self.db)
            .await
    }

    /// Deletes an expense and prunes it from settlement references, all
    /// inside one database transaction.
    ///
    /// Settlements whose `related_expense_ids` becomes empty are deleted
    /// with it. A repeated delete finds the expense absent and fails with
    /// `NotFound`; it never half-runs the cascade.
    ///
    /// # Errors
    ///
    /// Returns an error if the expense is missing, the acting user is
    /// neither creator nor payer, or a database operation fails.
    pub async fn delete_cascade(
        &self,
        id: ExpenseId,
        acting_user: UserId,
    ) -> Result<(), ExpenseError> {
        let txn = self.db.begin().await?;

        let expense = expenses::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or(ExpenseError::NotFound(id.into_inner()))?;

        let actor = acting_user.into_inner();
        if expense.created_by != actor && expense.paid_by_user_id != actor {
            return Err(ExpenseError::DeleteForbidden);
        }

        let referencing = settlements::Entity::find()
            .filter(related_probe(expense.id))
            .all(&txn)
            .await?;

        for settlement in referencing {
            let remaining: Vec<Uuid> = settlement
                .related_expense_ids
                .0
                .iter()
                .copied()
                .filter(|rid| *rid != expense.id)
                .collect();

            if remaining.is_empty() {
                debug!(settlement_id = %settlement.id, "settlement only covered this expense, deleting");
                settlements::Entity::delete_by_id(settlement.id)
                    .exec(&txn)
                    .await?;
            } else {
                let mut pruned: settlements::ActiveModel = settlement.into();
                pruned.related_expense_ids = Set(RelatedExpenseIdsJson(remaining));
                pruned.update(&txn).await?;
            }
        }

        expenses::Entity::delete_by_id(expense.id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}

/// Midnight UTC on January 1 of `year`.
fn year_start(year: i32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()
}
