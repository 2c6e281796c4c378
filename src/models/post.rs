//! Post Model
//!
//! Post data structures: store rows and API response shapes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::user::Author;

/// Post row joined with its author and aggregated like set
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PostWithAuthorRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub like_user_ids: Vec<Uuid>,
}

/// Post as returned by list/create/update operations
///
/// The like set is exposed as user ids; `get` resolves likers to display
/// fields via [`PostDetail`].
#[derive(Debug, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub author: Author,
    pub likes: Vec<Uuid>,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostWithAuthorRow> for Post {
    fn from(row: PostWithAuthorRow) -> Self {
        let likes_count = row.like_user_ids.len() as i64;
        Post {
            id: row.id,
            title: row.title,
            content: row.content,
            images: row.images,
            author: Author {
                id: row.author_id,
                name: row.author_name,
                email: row.author_email,
            },
            likes: row.like_user_ids,
            likes_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Single-post view with liking users resolved to display fields
#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub author: Author,
    pub liked_by: Vec<Author>,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a like toggle
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LikeStatus {
    pub likes_count: i64,
    pub is_liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion_counts_likes() {
        let liker = Uuid::new_v4();
        let row = PostWithAuthorRow {
            id: Uuid::new_v4(),
            title: "Hi".to_string(),
            content: "Body".to_string(),
            images: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
            author_id: Uuid::new_v4(),
            author_name: "A".to_string(),
            author_email: "a@x.com".to_string(),
            like_user_ids: vec![liker],
        };

        let post: Post = row.into();
        assert_eq!(post.likes_count, 1);
        assert_eq!(post.likes, vec![liker]);
        assert_eq!(post.author.name, "A");
    }
}
