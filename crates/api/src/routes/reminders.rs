//! Payment reminder routes.
//!
//! Sends a nudge email to every counterpart currently owing the caller.
//! Delivery failures are reported per recipient and never fail the
//! request; the ledger itself is untouched.

use axum::{Json, Router, extract::State, routing::post};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::require_user;
use crate::{AppState, middleware::AuthUser};
use divvy_core::ledger::{self, balance_summary};
use divvy_db::entities::users;
use divvy_db::{ExpenseRepository, SettlementRepository, UserRepository};
use divvy_shared::types::UserId;

/// Creates the reminder routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/reminders", post(send_reminders))
}

// ============================================================================
// Response Types
// ============================================================================

/// Per-recipient delivery outcome.
#[derive(Debug, Serialize)]
pub struct ReminderOutcome {
    /// The counterpart the reminder was addressed to.
    pub user_id: Uuid,
    /// Whether the message was handed to the relay.
    pub success: bool,
    /// Message ID on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Error description on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response for a reminder run.
#[derive(Debug, Serialize)]
pub struct RemindersResponse {
    /// Number of reminders handed to the relay.
    pub sent: usize,
    /// Per-recipient outcomes, one per counterpart owing the caller.
    pub results: Vec<ReminderOutcome>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Renders the reminder body.
fn reminder_html(sender_name: &str, debtor_name: &str, amount: Decimal) -> String {
    format!(
        "<p>Hi {debtor_name},</p>\
         <p>This is a friendly reminder that you currently owe \
         <strong>{sender_name}</strong> a total of <strong>{amount}</strong>.</p>\
         <p>You can settle up from your Divvy dashboard.</p>"
    )
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /reminders
///
/// Resolves the caller's aggregate position and emails every counterpart
/// in the owed-to-caller list.
#[axum::debug_handler]
async fn send_reminders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<RemindersResponse>, ApiError> {
    let user = require_user(&state, auth.user_id()).await?;
    let me = UserId::from_uuid(user.id);

    let expense_repo = ExpenseRepository::new((*state.db).clone());
    let settlement_repo = SettlementRepository::new((*state.db).clone());

    let expenses = expense_repo.list_touching(me).await?;
    let settlements = settlement_repo.list_touching(me).await?;

    let expense_views: Vec<ledger::Expense> = expenses.iter().map(Into::into).collect();
    let settlement_views: Vec<ledger::Settlement> = settlements.iter().map(Into::into).collect();

    let summary = balance_summary(me, &expense_views, &settlement_views);
    let debtors = &summary.owe_details.you_are_owed_by;

    let debtor_ids: Vec<UserId> = debtors.iter().map(|c| c.user_id).collect();
    let user_repo = UserRepository::new((*state.db).clone());
    let records = user_repo.find_by_ids(&debtor_ids).await?;

    let mut results = Vec::with_capacity(debtors.len());
    for counterpart in debtors {
        let outcome = match find_record(&records, counterpart.user_id) {
            Some(debtor) => {
                send_one(&state, &user.name, debtor, counterpart.amount).await
            }
            None => ReminderOutcome {
                user_id: counterpart.user_id.into_inner(),
                success: false,
                id: None,
                error: Some("No user record for this counterpart".to_string()),
            },
        };
        results.push(outcome);
    }

    let sent = results.iter().filter(|o| o.success).count();
    Ok(Json(RemindersResponse { sent, results }))
}

/// Finds a loaded user record by counterpart id.
fn find_record(records: &[users::Model], id: UserId) -> Option<&users::Model> {
    records.iter().find(|r| r.id == id.into_inner())
}

/// Sends a single reminder and reports the outcome.
async fn send_one(
    state: &AppState,
    sender_name: &str,
    debtor: &users::Model,
    amount: Decimal,
) -> ReminderOutcome {
    let subject = format!("{sender_name} sent you a payment reminder");
    let html = reminder_html(sender_name, &debtor.name, amount);
    let text = format!(
        "Hi {}, this is a reminder that you owe {} a total of {}.",
        debtor.name, sender_name, amount
    );

    match state
        .email_service
        .send(&debtor.email, &subject, &html, Some(&text))
        .await
    {
        Ok(message_id) => {
            info!(recipient = %debtor.id, "reminder sent");
            ReminderOutcome {
                user_id: debtor.id,
                success: true,
                id: Some(message_id),
                error: None,
            }
        }
        Err(e) => {
            warn!(recipient = %debtor.id, error = %e, "reminder send failed");
            ReminderOutcome {
                user_id: debtor.id,
                success: false,
                id: None,
                error: Some(e.to_string()),
            }
        }
    }
}
