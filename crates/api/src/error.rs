//! Error-to-response mapping for API handlers.
//!
//! Repository and engine errors fold into the shared [`AppError`]
//! taxonomy; every failed request answers with the same JSON envelope:
//! `{"error": CODE, "message": text}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

use divvy_core::ledger::{BalanceError, SplitValidationError};
use divvy_db::repositories::{ExpenseError, SettlementError};
use divvy_shared::AppError;

/// Result alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// API-layer error that renders itself as a JSON response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// An authentication failure (401).
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self(AppError::Unauthenticated(message.into()))
    }

    /// A permission failure (403).
    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self(AppError::PermissionDenied(message.into()))
    }

    /// A missing-resource failure (404).
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }

    /// A violated domain rule (422).
    #[must_use]
    pub fn invariant(message: impl Into<String>) -> Self {
        Self(AppError::InvariantViolation(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }

        let body = Json(json!({
            "error": self.0.error_code(),
            "message": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<SplitValidationError> for ApiError {
    fn from(err: SplitValidationError) -> Self {
        Self(AppError::InvariantViolation(err.to_string()))
    }
}

impl From<BalanceError> for ApiError {
    fn from(err: BalanceError) -> Self {
        Self(AppError::InvariantViolation(err.to_string()))
    }
}

impl From<ExpenseError> for ApiError {
    fn from(err: ExpenseError) -> Self {
        let app = match &err {
            ExpenseError::NotFound(_) | ExpenseError::GroupNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            ExpenseError::NotGroupMember | ExpenseError::DeleteForbidden => {
                AppError::PermissionDenied(err.to_string())
            }
            ExpenseError::NonPositiveAmount | ExpenseError::InvalidSplits(_) => {
                AppError::InvariantViolation(err.to_string())
            }
            ExpenseError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<SettlementError> for ApiError {
    fn from(err: SettlementError) -> Self {
        let app = match &err {
            SettlementError::UserNotFound(_) => AppError::NotFound(err.to_string()),
            SettlementError::NonPositiveAmount | SettlementError::SameParty => {
                AppError::InvariantViolation(err.to_string())
            }
            SettlementError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case::missing_expense(ExpenseError::NotFound(Uuid::nil()), 404, "NOT_FOUND")]
    #[case::missing_group(ExpenseError::GroupNotFound(Uuid::nil()), 404, "NOT_FOUND")]
    #[case::outsider(ExpenseError::NotGroupMember, 403, "PERMISSION_DENIED")]
    #[case::stranger_delete(ExpenseError::DeleteForbidden, 403, "PERMISSION_DENIED")]
    #[case::zero_amount(ExpenseError::NonPositiveAmount, 422, "INVARIANT_VIOLATION")]
    #[case::bad_splits(
        ExpenseError::InvalidSplits(SplitValidationError::NegativeAmount),
        422,
        "INVARIANT_VIOLATION"
    )]
    fn test_expense_error_mapping(
        #[case] err: ExpenseError,
        #[case] status: u16,
        #[case] code: &str,
    ) {
        let api = ApiError::from(err);
        assert_eq!(api.0.status_code(), status);
        assert_eq!(api.0.error_code(), code);
    }

    #[rstest]
    #[case::unknown_user(SettlementError::UserNotFound(Uuid::nil()), 404, "NOT_FOUND")]
    #[case::zero_amount(SettlementError::NonPositiveAmount, 422, "INVARIANT_VIOLATION")]
    #[case::self_payment(SettlementError::SameParty, 422, "INVARIANT_VIOLATION")]
    fn test_settlement_error_mapping(
        #[case] err: SettlementError,
        #[case] status: u16,
        #[case] code: &str,
    ) {
        let api = ApiError::from(err);
        assert_eq!(api.0.status_code(), status);
        assert_eq!(api.0.error_code(), code);
    }

    #[test]
    fn test_self_query_is_unprocessable() {
        let api = ApiError::from(BalanceError::SelfQuery);
        assert_eq!(api.0.status_code(), 422);
        assert_eq!(api.0.error_code(), "INVARIANT_VIOLATION");
    }

    #[test]
    fn test_db_errors_stay_internal() {
        let api = ApiError::from(DbErr::Custom("connection reset".to_string()));
        assert_eq!(api.0.status_code(), 500);
        assert_eq!(api.0.error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_constructor_status_codes() {
        assert_eq!(ApiError::unauthenticated("x").0.status_code(), 401);
        assert_eq!(ApiError::permission_denied("x").0.status_code(), 403);
        assert_eq!(ApiError::not_found("x").0.status_code(), 404);
        assert_eq!(ApiError::invariant("x").0.status_code(), 422);
    }

    #[test]
    fn test_into_response_sets_status() {
        let response = ApiError::not_found("User not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
