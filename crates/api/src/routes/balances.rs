//! Balance resolution routes.
//!
//! Both endpoints gather the caller's ledger rows and fold them through
//! the engine in `divvy-core`; nothing here is cached or precomputed.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::expenses::ExpenseResponse;
use crate::routes::require_user;
use crate::routes::settlements::SettlementResponse;
use crate::routes::users::UserResponse;
use crate::{AppState, middleware::AuthUser};
use divvy_core::ledger::{self, BalanceSummary, balance_summary, pairwise_balance};
use divvy_db::{ExpenseRepository, SettlementRepository, UserRepository};
use divvy_shared::types::UserId;

/// Creates the balance routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/balances", get(get_aggregate_balances))
        .route("/balances/{user_id}", get(get_balance_between))
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for the caller's aggregate position.
#[derive(Debug, Serialize)]
pub struct BalanceSummaryResponse {
    /// Total the caller owes others.
    pub you_owe: Decimal,
    /// Total others owe the caller.
    pub you_are_owed: Decimal,
    /// `you_are_owed - you_owe`.
    pub total_balance: Decimal,
    /// Per-counterpart breakdown.
    pub owe_details: OweDetailsResponse,
}

/// Per-counterpart breakdown of the caller's position.
#[derive(Debug, Serialize)]
pub struct OweDetailsResponse {
    /// Counterparts the caller owes, largest first.
    pub you_owe: Vec<CounterpartResponse>,
    /// Counterparts owing the caller, largest first.
    pub you_are_owed_by: Vec<CounterpartResponse>,
}

/// One counterpart entry.
#[derive(Debug, Serialize)]
pub struct CounterpartResponse {
    /// The counterpart.
    pub user_id: Uuid,
    /// Outstanding amount, always positive.
    pub amount: Decimal,
}

impl From<BalanceSummary> for BalanceSummaryResponse {
    fn from(summary: BalanceSummary) -> Self {
        let to_entries = |list: Vec<ledger::CounterpartBalance>| {
            list.into_iter()
                .map(|c| CounterpartResponse {
                    user_id: c.user_id.into_inner(),
                    amount: c.amount,
                })
                .collect()
        };

        Self {
            you_owe: summary.you_owe,
            you_are_owed: summary.you_are_owed,
            total_balance: summary.total_balance,
            owe_details: OweDetailsResponse {
                you_owe: to_entries(summary.owe_details.you_owe),
                you_are_owed_by: to_entries(summary.owe_details.you_are_owed_by),
            },
        }
    }
}

/// Response for the balance against one counterpart.
#[derive(Debug, Serialize)]
pub struct PairwiseBalanceResponse {
    /// Expenses involving both users, newest first.
    pub expenses: Vec<ExpenseResponse>,
    /// Settlements between the two users, newest first.
    pub settlements: Vec<SettlementResponse>,
    /// The counterpart's user record.
    pub other_user: UserResponse,
    /// Net amount the counterpart owes the caller; negative when the
    /// caller owes them.
    pub balance: Decimal,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /balances
///
/// Resolves the caller's position across every counterpart.
#[axum::debug_handler]
async fn get_aggregate_balances(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<BalanceSummaryResponse>, ApiError> {
    let user = require_user(&state, auth.user_id()).await?;
    let me = UserId::from_uuid(user.id);

    let expense_repo = ExpenseRepository::new((*state.db).clone());
    let settlement_repo = SettlementRepository::new((*state.db).clone());

    let expenses = expense_repo.list_touching(me).await?;
    let settlements = settlement_repo.list_touching(me).await?;

    let expense_views: Vec<ledger::Expense> = expenses.iter().map(Into::into).collect();
    let settlement_views: Vec<ledger::Settlement> = settlements.iter().map(Into::into).collect();

    let summary = balance_summary(me, &expense_views, &settlement_views);
    Ok(Json(BalanceSummaryResponse::from(summary)))
}

/// GET /balances/{user_id}
///
/// Resolves the net balance between the caller and one other user and
/// returns the rows it was folded from.
#[axum::debug_handler]
async fn get_balance_between(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PairwiseBalanceResponse>, ApiError> {
    let user = require_user(&state, auth.user_id()).await?;
    let me = UserId::from_uuid(user.id);
    let other = UserId::from_uuid(user_id);

    let user_repo = UserRepository::new((*state.db).clone());
    let other_user = user_repo
        .find_by_id(other)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let expense_repo = ExpenseRepository::new((*state.db).clone());
    let settlement_repo = SettlementRepository::new((*state.db).clone());

    let expenses = expense_repo.list_between_users(me, other).await?;
    let settlements = settlement_repo.list_between_users(me, other).await?;

    let expense_views: Vec<ledger::Expense> = expenses.iter().map(Into::into).collect();
    let settlement_views: Vec<ledger::Settlement> = settlements.iter().map(Into::into).collect();

    let balance = pairwise_balance(me, other, &expense_views, &settlement_views)?;

    Ok(Json(PairwiseBalanceResponse {
        expenses: expenses.into_iter().map(ExpenseResponse::from).collect(),
        settlements: settlements
            .into_iter()
            .map(SettlementResponse::from)
            .collect(),
        other_user: UserResponse::from(other_user),
        balance,
    }))
}
