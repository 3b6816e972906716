//! Settlement repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use divvy_shared::types::{ExpenseId, SettlementId, UserId};

use crate::entities::{
    settlements::{self, RelatedExpenseIdsJson},
    users,
};

/// Error types for settlement operations.
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    /// Referenced user does not exist.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Settlement amount must be positive.
    #[error("Settlement amount must be positive")]
    NonPositiveAmount,

    /// Payer and receiver must differ.
    #[error("Cannot record a settlement with yourself")]
    SameParty,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a settlement.
#[derive(Debug, Clone)]
pub struct CreateSettlementInput {
    /// Amount transferred.
    pub amount: Decimal,
    /// Optional note.
    pub note: Option<String>,
    /// When the payment happened.
    pub date: DateTime<Utc>,
    /// Who paid.
    pub paid_by_user_id: UserId,
    /// Who received the money.
    pub received_by_user_id: UserId,
    /// Expenses this payment covered (advisory).
    pub related_expense_ids: Vec<ExpenseId>,
}

/// Settlement repository for creation and pair/touching scans.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    db: DatabaseConnection,
}

impl SettlementRepository {
    /// Creates a new settlement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a settlement between two existing, distinct users.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive, payer and receiver
    /// are the same user, either user does not exist, or the insert fails.
    pub async fn create(
        &self,
        input: CreateSettlementInput,
    ) -> Result<settlements::Model, SettlementError> {
        if input.amount <= Decimal::ZERO {
            return Err(SettlementError::NonPositiveAmount);
        }
        if input.paid_by_user_id == input.received_by_user_id {
            return Err(SettlementError::SameParty);
        }

        for user_id in [input.paid_by_user_id, input.received_by_user_id] {
            let uuid = user_id.into_inner();
            users::Entity::find_by_id(uuid)
                .one(&self.db)
                .await?
                .ok_or(SettlementError::UserNotFound(uuid))?;
        }

        let related: Vec<Uuid> = input
            .related_expense_ids
            .iter()
            .map(|id| id.into_inner())
            .collect();

        let settlement = settlements::ActiveModel {
            id: Set(SettlementId::new().into_inner()),
            amount: Set(input.amount),
            note: Set(input.note),
            date: Set(input.date.into()),
            paid_by_user_id: Set(input.paid_by_user_id.into_inner()),
            received_by_user_id: Set(input.received_by_user_id.into_inner()),
            related_expense_ids: Set(RelatedExpenseIdsJson(related)),
            created_at: Set(Utc::now().into()),
        };

        Ok(settlement.insert(&self.db).await?)
    }

    /// Lists settlements between two users in either direction, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_between_users(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<Vec<settlements::Model>, DbErr> {
        let a = a.into_inner();
        let b = b.into_inner();

        settlements::Entity::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(settlements::Column::PaidByUserId.eq(a))
                            .add(settlements::Column::ReceivedByUserId.eq(b)),
                    )
                    .add(
                        Condition::all()
                            .add(settlements::Column::PaidByUserId.eq(b))
                            .add(settlements::Column::ReceivedByUserId.eq(a)),
                    ),
            )
            .order_by_desc(settlements::Column::Date)
            .all(&self.db)
            .await
    }

    /// Lists every settlement touching a user, as payer or receiver.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_touching(&self, user_id: UserId) -> Result<Vec<settlements::Model>, DbErr> {
        let user = user_id.into_inner();

        settlements::Entity::find()
            .filter(
                Condition::any()
                    .add(settlements::Column::PaidByUserId.eq(user))
                    .add(settlements::Column::ReceivedByUserId.eq(user)),
            )
            .all(&self.db)
            .await
    }
}
