//! Group repository for database operations.

use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::json;
use uuid::Uuid;

use divvy_shared::types::{GroupId, UserId};

use crate::entities::groups::{self, MemberRecord, MembersJson};

/// Group repository for lookups and membership probes.
#[derive(Debug, Clone)]
pub struct GroupRepository {
    db: DatabaseConnection,
}

/// Input for creating a group.
#[derive(Debug, Clone)]
pub struct CreateGroupInput {
    /// Group name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creating user; always becomes a member.
    pub created_by: UserId,
    /// Additional members.
    pub member_ids: Vec<UserId>,
}

/// Containment probe matching groups whose member list includes `user_id`.
fn member_probe(user_id: Uuid) -> SimpleExpr {
    Expr::cust_with_values("members @> ?", [json!([{ "user_id": user_id }])])
}

impl GroupRepository {
    /// Creates a new group repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a group by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: GroupId) -> Result<Option<groups::Model>, DbErr> {
        groups::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Lists the groups a user belongs to, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<groups::Model>, DbErr> {
        groups::Entity::find()
            .filter(member_probe(user_id.into_inner()))
            .order_by_asc(groups::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Creates a group. The creator is always included in the member list;
    /// duplicate member ids collapse to one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateGroupInput) -> Result<groups::Model, DbErr> {
        let mut members: Vec<MemberRecord> = vec![MemberRecord {
            user_id: input.created_by.into_inner(),
        }];
        for id in input.member_ids {
            let user_id = id.into_inner();
            if !members.iter().any(|m| m.user_id == user_id) {
                members.push(MemberRecord { user_id });
            }
        }

        let group = groups::ActiveModel {
            id: Set(GroupId::new().into_inner()),
            name: Set(input.name),
            description: Set(input.description),
            created_by: Set(input.created_by.into_inner()),
            members: Set(MembersJson(members)),
            created_at: Set(chrono::Utc::now().into()),
        };

        group.insert(&self.db).await
    }
}
