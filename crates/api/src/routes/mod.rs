//! API route definitions.

use axum::{Router, middleware};
use uuid::Uuid;

use crate::error::ApiError;
use crate::{AppState, middleware::auth::auth_middleware};
use divvy_db::UserRepository;
use divvy_shared::types::UserId;

pub mod balances;
pub mod expenses;
pub mod groups;
pub mod health;
pub mod reminders;
pub mod settlements;
pub mod spending;
pub mod users;

/// Creates the API router with protected routes that need state for middleware.
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(users::routes())
        .merge(groups::routes())
        .merge(expenses::routes())
        .merge(settlements::routes())
        .merge(balances::routes())
        .merge(spending::routes())
        .merge(reminders::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    // Combine public and protected routes
    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Loads the acting user's stored record.
///
/// The token only proves identity; the ledger can reference a caller that
/// has synced a user row via `PUT /users/me`.
pub(crate) async fn require_user(
    state: &AppState,
    user_id: Uuid,
) -> Result<divvy_db::entities::users::Model, ApiError> {
    let repo = UserRepository::new((*state.db).clone());
    repo.find_by_id(UserId::from_uuid(user_id))
        .await?
        .ok_or_else(|| ApiError::unauthenticated("No user record for this token"))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{AppState, create_router};
    use divvy_shared::config::EmailConfig;
    use divvy_shared::jwt::JwtConfig;
    use divvy_shared::{EmailService, JwtService};

    const TEST_SECRET: &str = "router-test-secret";

    fn test_state() -> AppState {
        AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
            jwt_service: Arc::new(JwtService::new(JwtConfig {
                secret: TEST_SECRET.to_string(),
                access_token_expires_minutes: 60,
            })),
            email_service: Arc::new(EmailService::new(EmailConfig::default())),
        }
    }

    async fn error_code(response: axum::response::Response) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        json["error"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_health_needs_no_token() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/balances")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "missing_token");
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/balances")
                    .header("authorization", "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "invalid_token");
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        // Same secret, already-elapsed expiry.
        let expired = JwtService::new(JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expires_minutes: -10,
        })
        .generate_access_token(Uuid::now_v7())
        .unwrap();

        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/spending/total")
                    .header("authorization", format!("Bearer {expired}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "token_expired");
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
