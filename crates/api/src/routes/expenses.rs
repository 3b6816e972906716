//! Expense routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::require_user;
use crate::{AppState, middleware::AuthUser};
use divvy_db::ExpenseRepository;
use divvy_db::entities::SplitType;
use divvy_db::entities::expenses::{self, SplitRecord};
use divvy_db::repositories::CreateExpenseInput;
use divvy_shared::types::{ExpenseId, GroupId, UserId};

/// Creates the expense routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", post(create_expense))
        .route("/expenses/{id}", delete(delete_expense))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// What the expense was for.
    pub description: String,
    /// Total amount paid.
    pub amount: Decimal,
    /// Category label; empty or absent becomes `Other`.
    pub category: Option<String>,
    /// When the expense happened (RFC 3339).
    pub date: DateTime<Utc>,
    /// Who fronted the money; defaults to the caller.
    pub paid_by_user_id: Option<Uuid>,
    /// How the split was derived; defaults to `equal`.
    pub split_type: Option<SplitType>,
    /// Per-participant shares; must sum to `amount`.
    pub splits: Vec<SplitRequest>,
    /// Group this expense belongs to.
    pub group_id: Option<Uuid>,
}

/// One participant's share in the request body.
#[derive(Debug, Deserialize)]
pub struct SplitRequest {
    /// The participant.
    pub user_id: Uuid,
    /// This participant's share.
    pub amount: Decimal,
    /// Whether the share is already settled; payers usually submit their
    /// own share as paid.
    #[serde(default)]
    pub paid: bool,
}

/// Response for a stored expense.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    /// Expense ID.
    pub id: Uuid,
    /// Description.
    pub description: String,
    /// Total amount.
    pub amount: Decimal,
    /// Category label.
    pub category: String,
    /// When the expense happened.
    pub date: DateTime<Utc>,
    /// Who fronted the money.
    pub paid_by_user_id: Uuid,
    /// How the split was derived.
    pub split_type: SplitType,
    /// Per-participant shares.
    pub splits: Vec<SplitResponse>,
    /// Group, if any.
    pub group_id: Option<Uuid>,
    /// Who recorded the expense.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// One participant's share in a response.
#[derive(Debug, Serialize)]
pub struct SplitResponse {
    /// The participant.
    pub user_id: Uuid,
    /// Share amount.
    pub amount: Decimal,
    /// Whether the share is settled.
    pub paid: bool,
}

impl From<SplitRecord> for SplitResponse {
    fn from(record: SplitRecord) -> Self {
        Self {
            user_id: record.user_id,
            amount: record.amount,
            paid: record.paid,
        }
    }
}

impl From<expenses::Model> for ExpenseResponse {
    fn from(model: expenses::Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            amount: model.amount,
            category: model.category,
            date: model.date.to_utc(),
            paid_by_user_id: model.paid_by_user_id,
            split_type: model.split_type,
            splits: model
                .splits
                .0
                .into_iter()
                .map(SplitResponse::from)
                .collect(),
            group_id: model.group_id,
            created_by: model.created_by,
            created_at: model.created_at.to_utc(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /expenses
///
/// Records an expense. Split amounts must sum to the total within the
/// validation tolerance; grouped expenses require membership.
#[axum::debug_handler]
async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = require_user(&state, auth.user_id()).await?;

    let repo = ExpenseRepository::new((*state.db).clone());
    let expense = repo
        .create(CreateExpenseInput {
            description: payload.description,
            amount: payload.amount,
            category: payload.category,
            date: payload.date,
            paid_by_user_id: UserId::from_uuid(payload.paid_by_user_id.unwrap_or(user.id)),
            split_type: payload.split_type.unwrap_or(SplitType::Equal),
            splits: payload
                .splits
                .into_iter()
                .map(|s| SplitRecord {
                    user_id: s.user_id,
                    amount: s.amount,
                    paid: s.paid,
                })
                .collect(),
            group_id: payload.group_id.map(GroupId::from_uuid),
            created_by: UserId::from_uuid(user.id),
        })
        .await?;

    info!(expense_id = %expense.id, amount = %expense.amount, "expense recorded");
    Ok((StatusCode::CREATED, Json(ExpenseResponse::from(expense))))
}

/// DELETE /expenses/{id}
///
/// Deletes an expense and prunes settlement references to it. Only the
/// creator or the payer may delete.
#[axum::debug_handler]
async fn delete_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = require_user(&state, auth.user_id()).await?;

    let repo = ExpenseRepository::new((*state.db).clone());
    repo.delete_cascade(ExpenseId::from_uuid(id), UserId::from_uuid(user.id))
        .await?;

    info!(expense_id = %id, "expense deleted");
    Ok(Json(json!({ "success": true })))
}
