//! User profile sync routes.
//!
//! User rows mirror the external identity service. `PUT /users/me` is the
//! only write path and is keyed by the token subject; nothing else in the
//! system creates users.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::require_user;
use crate::{AppState, middleware::AuthUser};
use divvy_db::UserRepository;
use divvy_db::entities::users;
use divvy_db::repositories::UpsertUserInput;
use divvy_shared::types::UserId;

/// Creates the user routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", put(sync_me))
        .route("/users/me", get(get_me))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for syncing the caller's profile.
#[derive(Debug, Deserialize)]
pub struct SyncUserRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Optional avatar URL.
    pub image_url: Option<String>,
}

/// Response for a user record.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Avatar URL.
    pub image_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for UserResponse {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            image_url: model.image_url,
            created_at: model.created_at.to_utc(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// PUT /users/me
///
/// Upserts the caller's user record from the identity payload.
#[axum::debug_handler]
async fn sync_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SyncUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = UserRepository::new((*state.db).clone());
    let user = repo
        .upsert(UpsertUserInput {
            id: UserId::from_uuid(auth.user_id()),
            name: payload.name,
            email: payload.email,
            image_url: payload.image_url,
        })
        .await?;

    info!(user_id = %user.id, "user profile synced");
    Ok(Json(UserResponse::from(user)))
}

/// GET /users/me
///
/// Returns the caller's synced record.
#[axum::debug_handler]
async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = require_user(&state, auth.user_id()).await?;
    Ok(Json(UserResponse::from(user)))
}
