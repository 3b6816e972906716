//! Spending aggregation routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::require_user;
use crate::{AppState, middleware::AuthUser};
use divvy_core::ledger;
use divvy_core::spending::{monthly_spending, total_spent};
use divvy_db::ExpenseRepository;
use divvy_shared::types::UserId;

/// Creates the spending routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/spending/monthly", get(get_monthly_spending))
        .route("/spending/total", get(get_total_spending))
}

// ============================================================================
// Query Parameters / Response Types
// ============================================================================

/// Query parameters for spending lookups.
#[derive(Debug, Deserialize)]
pub struct SpendingQuery {
    /// Calendar year; defaults to the current UTC year.
    pub year: Option<i32>,
}

/// One month's spending.
#[derive(Debug, Serialize)]
pub struct MonthlySpendingResponse {
    /// First instant of the month (UTC).
    pub month: DateTime<Utc>,
    /// The caller's share of expenses dated in that month.
    pub total: Decimal,
}

/// Response for a year's spending.
#[derive(Debug, Serialize)]
pub struct TotalSpendingResponse {
    /// The caller's share of expenses dated in the year.
    pub total: Decimal,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /spending/monthly
///
/// Returns twelve month buckets for the requested year, zero-filled.
#[axum::debug_handler]
async fn get_monthly_spending(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SpendingQuery>,
) -> Result<Json<Vec<MonthlySpendingResponse>>, ApiError> {
    let user = require_user(&state, auth.user_id()).await?;
    let me = UserId::from_uuid(user.id);
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    let repo = ExpenseRepository::new((*state.db).clone());
    let expenses = repo.list_for_year(me, year).await?;
    let views: Vec<ledger::Expense> = expenses.iter().map(Into::into).collect();

    let months = monthly_spending(me, year, &views)
        .into_iter()
        .map(|m| MonthlySpendingResponse {
            month: m.month,
            total: m.total,
        })
        .collect();

    Ok(Json(months))
}

/// GET /spending/total
///
/// Returns the caller's total share of expenses dated in the year.
#[axum::debug_handler]
async fn get_total_spending(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SpendingQuery>,
) -> Result<Json<TotalSpendingResponse>, ApiError> {
    let user = require_user(&state, auth.user_id()).await?;
    let me = UserId::from_uuid(user.id);
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    let repo = ExpenseRepository::new((*state.db).clone());
    let expenses = repo.list_for_year(me, year).await?;
    let views: Vec<ledger::Expense> = expenses.iter().map(Into::into).collect();

    let total = total_spent(me, year, &views);
    Ok(Json(TotalSpendingResponse { total }))
}
