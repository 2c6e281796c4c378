//! Request and Response Models
//!
//! Data structures for API request and response payloads with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    comment::Comment,
    post::{Post, PostDetail},
    user::User,
};
use crate::utils::validation::{comment_content_validator, email_validator, name_validator};

/// Request payload for creating a new account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    /// User's email address (must be unique and valid format)
    #[validate(custom(function = "email_validator"))]
    pub email: String,

    /// User's password (6-128 characters)
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password must be between 6 and 128 characters"
    ))]
    pub password: String,

    /// User's display name (1-50 characters)
    #[validate(custom(function = "name_validator"))]
    pub name: String,
}

/// Request payload for email/password login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request payload for federated Google login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GoogleLoginRequest {
    /// Provider-signed ID token from the Google sign-in widget
    #[validate(length(min = 1, message = "Google credential is required"))]
    pub credential: String,
}

/// Request payload for creating a comment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// Comment text (non-blank, at most 500 characters)
    #[validate(custom(function = "comment_content_validator"))]
    pub content: String,
}

/// Partial-update patch for a post
///
/// Empty or absent fields leave the existing value unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPatch {
    /// Drop empty/whitespace-only fields so they cannot overwrite anything
    pub fn normalized(self) -> Self {
        let keep = |field: Option<String>| field.filter(|v| !v.trim().is_empty());
        Self {
            title: keep(self.title),
            content: keep(self.content),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Response payload for signup/login/google: the user plus a fresh token
#[derive(Debug, Serialize)]
pub struct AuthData {
    pub user: User,
    pub token: String,
}

/// Response payload for `GET /api/auth/me`
#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: User,
}

/// Response payload for the post list
#[derive(Debug, Serialize)]
pub struct PostListData {
    pub posts: Vec<Post>,
    pub count: usize,
}

/// Response payload wrapping a single post
#[derive(Debug, Serialize)]
pub struct PostData {
    pub post: Post,
}

/// Response payload wrapping a single post with resolved likers
#[derive(Debug, Serialize)]
pub struct PostDetailData {
    pub post: PostDetail,
}

/// Response payload for the comment list of a post
#[derive(Debug, Serialize)]
pub struct CommentListData {
    pub comments: Vec<Comment>,
    pub count: usize,
}

/// Response payload wrapping a single comment
#[derive(Debug, Serialize)]
pub struct CommentData {
    pub comment: Comment,
}

/// Response for health check
#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_validation() {
        let request = SignupRequest {
            email: "john@example.com".to_string(),
            password: "secret1".to_string(),
            name: "John Doe".to_string(),
        };
        assert!(request.validate().is_ok());

        let short_password = SignupRequest {
            email: "john@example.com".to_string(),
            password: "12345".to_string(),
            name: "John Doe".to_string(),
        };
        assert!(short_password.validate().is_err());

        let bad_email = SignupRequest {
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
            name: "John Doe".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let blank_name = SignupRequest {
            email: "john@example.com".to_string(),
            password: "secret1".to_string(),
            name: "   ".to_string(),
        };
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_login_request_requires_both_fields() {
        let request = LoginRequest {
            email: "john@example.com".to_string(),
            password: "".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_comment_request_validation() {
        let ok = CreateCommentRequest {
            content: "First!".to_string(),
        };
        assert!(ok.validate().is_ok());

        let blank = CreateCommentRequest {
            content: "  \n".to_string(),
        };
        assert!(blank.validate().is_err());

        let long = CreateCommentRequest {
            content: "a".repeat(501),
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_post_patch_normalization() {
        let patch = PostPatch {
            title: Some("".to_string()),
            content: Some("new".to_string()),
        }
        .normalized();

        assert!(patch.title.is_none());
        assert_eq!(patch.content.as_deref(), Some("new"));

        let blank = PostPatch {
            title: Some("   ".to_string()),
            content: None,
        }
        .normalized();
        assert!(blank.is_empty());
    }
}
