//! Settlement routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::require_user;
use crate::{AppState, middleware::AuthUser};
use divvy_db::SettlementRepository;
use divvy_db::entities::settlements;
use divvy_db::repositories::CreateSettlementInput;
use divvy_shared::types::{ExpenseId, UserId};

/// Creates the settlement routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/settlements", post(create_settlement))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for recording a settlement.
#[derive(Debug, Deserialize)]
pub struct CreateSettlementRequest {
    /// Amount transferred.
    pub amount: Decimal,
    /// Optional note.
    pub note: Option<String>,
    /// When the payment happened; defaults to now.
    pub date: Option<DateTime<Utc>>,
    /// Who paid; defaults to the caller.
    pub paid_by_user_id: Option<Uuid>,
    /// Who received the money.
    pub received_by_user_id: Uuid,
    /// Expenses this payment covered (advisory).
    #[serde(default)]
    pub related_expense_ids: Vec<Uuid>,
}

/// Response for a stored settlement.
#[derive(Debug, Serialize)]
pub struct SettlementResponse {
    /// Settlement ID.
    pub id: Uuid,
    /// Amount transferred.
    pub amount: Decimal,
    /// Note.
    pub note: Option<String>,
    /// When the payment happened.
    pub date: DateTime<Utc>,
    /// Who paid.
    pub paid_by_user_id: Uuid,
    /// Who received the money.
    pub received_by_user_id: Uuid,
    /// Expenses this payment covered.
    pub related_expense_ids: Vec<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<settlements::Model> for SettlementResponse {
    fn from(model: settlements::Model) -> Self {
        Self {
            id: model.id,
            amount: model.amount,
            note: model.note,
            date: model.date.to_utc(),
            paid_by_user_id: model.paid_by_user_id,
            received_by_user_id: model.received_by_user_id,
            related_expense_ids: model.related_expense_ids.0,
            created_at: model.created_at.to_utc(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /settlements
///
/// Records a payment between two users. The caller must be one of the
/// parties; both users must exist and must differ.
#[axum::debug_handler]
async fn create_settlement(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateSettlementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = require_user(&state, auth.user_id()).await?;

    let paid_by = payload.paid_by_user_id.unwrap_or(user.id);
    if paid_by != user.id && payload.received_by_user_id != user.id {
        return Err(ApiError::permission_denied(
            "You must be the payer or the receiver of a settlement",
        ));
    }

    let repo = SettlementRepository::new((*state.db).clone());
    let settlement = repo
        .create(CreateSettlementInput {
            amount: payload.amount,
            note: payload.note,
            date: payload.date.unwrap_or_else(Utc::now),
            paid_by_user_id: UserId::from_uuid(paid_by),
            received_by_user_id: UserId::from_uuid(payload.received_by_user_id),
            related_expense_ids: payload
                .related_expense_ids
                .into_iter()
                .map(ExpenseId::from_uuid)
                .collect(),
        })
        .await?;

    info!(settlement_id = %settlement.id, amount = %settlement.amount, "settlement recorded");
    Ok((StatusCode::CREATED, Json(SettlementResponse::from(settlement))))
}
