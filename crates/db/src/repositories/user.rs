//! User repository for database operations.
//!
//! User rows mirror an external identity provider; `upsert` is the only
//! write path and is keyed by the token subject.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use divvy_shared::types::UserId;

use crate::entities::users;

/// User repository for identity-sync and lookups.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

/// Input for syncing a user record from the identity provider.
#[derive(Debug, Clone)]
pub struct UpsertUserInput {
    /// Token subject.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Optional avatar URL.
    pub image_url: Option<String>,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Finds all users whose id appears in `ids`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<users::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        users::Entity::find()
            .filter(users::Column::Id.is_in(uuids))
            .all(&self.db)
            .await
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Creates or updates the user record for a token subject.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn upsert(&self, input: UpsertUserInput) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();

        if let Some(existing) = self.find_by_id(input.id).await? {
            let mut user: users::ActiveModel = existing.into();
            user.name = Set(input.name);
            user.email = Set(input.email);
            user.image_url = Set(input.image_url);
            user.updated_at = Set(now);
            return user.update(&self.db).await;
        }

        let user = users::ActiveModel {
            id: Set(input.id.into_inner()),
            name: Set(input.name),
            email: Set(input.email),
            image_url: Set(input.image_url),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }
}
