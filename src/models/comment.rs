//! Comment Model

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::user::Author;

/// Comment row joined with its author and aggregated reaction sets
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CommentWithAuthorRow {
    pub id: Uuid,
    pub content: String,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub like_user_ids: Vec<Uuid>,
    pub dislike_user_ids: Vec<Uuid>,
}

/// Comment as returned by the API, author resolved to display fields
#[derive(Debug, Serialize)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub post_id: Uuid,
    pub author: Author,
    pub likes: Vec<Uuid>,
    pub dislikes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<CommentWithAuthorRow> for Comment {
    fn from(row: CommentWithAuthorRow) -> Self {
        Comment {
            id: row.id,
            content: row.content,
            post_id: row.post_id,
            author: Author {
                id: row.author_id,
                name: row.author_name,
                email: row.author_email,
            },
            likes: row.like_user_ids,
            dislikes: row.dislike_user_ids,
            created_at: row.created_at,
        }
    }
}

/// Which reaction set a comment toggle targets
///
/// The sets are independent; toggling one never mutates the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    /// Store representation, matches the comment_reactions check constraint
    pub fn as_str(self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Dislike => "dislike",
        }
    }
}

/// Result of a comment reaction toggle
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReactionStatus {
    pub likes_count: i64,
    pub dislikes_count: i64,
    /// Whether the toggled reaction is active for the acting user afterwards
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_kind_store_representation() {
        assert_eq!(ReactionKind::Like.as_str(), "like");
        assert_eq!(ReactionKind::Dislike.as_str(), "dislike");
    }
}
