//! User Model
//!
//! Core user data structures and type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User representation for external API responses
///
/// This struct represents a user profile without sensitive information like
/// password hashes. All datetime fields use UTC.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// User's email address (unique, normalized)
    pub email: String,

    /// User's display name
    pub name: String,

    /// Federated-identity subject, set on first Google login
    pub google_id: Option<String>,

    /// Optional URL to the user's profile picture
    pub profile_picture_url: Option<String>,

    /// Timestamp when the user account was created
    pub created_at: DateTime<Utc>,
}

/// Internal user representation including password hash
///
/// Used for store operations that need the hash (login). Never exposed in
/// API responses.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserWithPassword {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub google_id: Option<String>,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserWithPassword> for User {
    /// Strips the password hash so it cannot leak into an API response
    fn from(user: UserWithPassword) -> Self {
        User {
            id: user.id,
            email: user.email,
            name: user.name,
            google_id: user.google_id,
            profile_picture_url: user.profile_picture_url,
            created_at: user.created_at,
        }
    }
}

/// Owner identity resolved to display fields for post/comment responses
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_with_password_conversion() {
        let user_with_password = UserWithPassword {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "hashed_password".to_string(),
            name: "Test User".to_string(),
            google_id: None,
            profile_picture_url: Some("https://example.com/avatar.jpg".to_string()),
            created_at: Utc::now(),
        };

        let user: User = user_with_password.into();

        assert_eq!(user.name, "Test User");
        assert_eq!(user.email, "test@example.com");
        assert_eq!(
            user.profile_picture_url,
            Some("https://example.com/avatar.jpg".to_string())
        );
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            name: "A".to_string(),
            google_id: None,
            profile_picture_url: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
    }
}
