//! Group routes.
//!
//! Groups gate expense creation: a grouped expense may only be recorded
//! by a member. Membership lives in the group row itself.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::require_user;
use crate::{AppState, middleware::AuthUser};
use divvy_db::GroupRepository;
use divvy_db::entities::groups;
use divvy_db::repositories::CreateGroupInput;
use divvy_shared::types::UserId;

/// Creates the group routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups", get(list_groups))
        .route("/groups", post(create_group))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a group.
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    /// Group name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Members besides the caller; the caller always joins.
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
}

/// Response for a group.
#[derive(Debug, Serialize)]
pub struct GroupResponse {
    /// Group ID.
    pub id: Uuid,
    /// Group name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Creating user.
    pub created_by: Uuid,
    /// Member user IDs.
    pub members: Vec<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<groups::Model> for GroupResponse {
    fn from(model: groups::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_by: model.created_by,
            members: model.members.0.into_iter().map(|m| m.user_id).collect(),
            created_at: model.created_at.to_utc(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /groups
///
/// Lists the groups the caller belongs to, oldest first.
#[axum::debug_handler]
async fn list_groups(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<GroupResponse>>, ApiError> {
    let user = require_user(&state, auth.user_id()).await?;

    let repo = GroupRepository::new((*state.db).clone());
    let groups = repo.list_for_user(UserId::from_uuid(user.id)).await?;

    Ok(Json(groups.into_iter().map(GroupResponse::from).collect()))
}

/// POST /groups
///
/// Creates a group with the caller as first member.
#[axum::debug_handler]
async fn create_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = require_user(&state, auth.user_id()).await?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::invariant("Group name must not be empty"));
    }

    let repo = GroupRepository::new((*state.db).clone());
    let group = repo
        .create(CreateGroupInput {
            name: payload.name,
            description: payload.description,
            created_by: UserId::from_uuid(user.id),
            member_ids: payload
                .member_ids
                .into_iter()
                .map(UserId::from_uuid)
                .collect(),
        })
        .await?;

    info!(group_id = %group.id, "group created");
    Ok((StatusCode::CREATED, Json(GroupResponse::from(group))))
}
