//! Authentication claims shared with the identity service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
///
/// Tokens are minted by the external identity service using the shared
/// secret; the subject is the user's ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_carry_user_id() {
        let user_id = Uuid::now_v7();
        let claims = Claims::new(user_id, Utc::now() + chrono::Duration::hours(1));
        assert_eq!(claims.user_id(), user_id);
        assert!(claims.exp > claims.iat);
    }
}
