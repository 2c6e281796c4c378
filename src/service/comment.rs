//! Comment Service
//!
//! Comment listing, creation, deletion, and reaction toggles, guarded the
//! same way as posts.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    comment::{Comment, CommentWithAuthorRow, ReactionKind, ReactionStatus},
    requests::CreateCommentRequest,
};
use crate::service::ownership::can_mutate;
use crate::utils::error::AppError;

/// Custom error types for the comment service
#[derive(Error, Debug)]
pub enum CommentServiceError {
    /// Comment with the specified identifier was not found
    #[error("Comment not found")]
    NotFound,

    /// Parent post was not found
    #[error("Post not found")]
    PostNotFound,

    /// Acting user does not own the comment
    #[error("Only the author can delete this comment")]
    Forbidden,

    /// Input validation failed with detailed error message
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<CommentServiceError> for AppError {
    fn from(err: CommentServiceError) -> Self {
        match err {
            CommentServiceError::NotFound => AppError::NotFound("Comment not found".to_string()),
            CommentServiceError::PostNotFound => AppError::NotFound("Post not found".to_string()),
            CommentServiceError::Forbidden => {
                AppError::Forbidden("Only the author can delete this comment".to_string())
            }
            CommentServiceError::ValidationError(msg) => AppError::Validation(msg),
            CommentServiceError::DatabaseError(e) => AppError::Database(e),
        }
    }
}

/// Result type for comment service operations
pub type CommentServiceResult<T> = Result<T, CommentServiceError>;

/// Select list for a comment joined with its author and reaction sets
const COMMENT_WITH_AUTHOR: &str = r#"
SELECT c.id, c.content, c.post_id, c.created_at,
       u.id AS author_id, u.name AS author_name, u.email AS author_email,
       COALESCE(array_agg(cr.user_id) FILTER (WHERE cr.reaction = 'like'),
                ARRAY[]::uuid[]) AS like_user_ids,
       COALESCE(array_agg(cr.user_id) FILTER (WHERE cr.reaction = 'dislike'),
                ARRAY[]::uuid[]) AS dislike_user_ids
FROM comments c
JOIN users u ON u.id = c.author_id
LEFT JOIN comment_reactions cr ON cr.comment_id = c.id
"#;

/// Comment service for the per-post comment threads
pub struct CommentService {
    /// Database connection pool, injected by the composition root
    pool: PgPool,
}

impl CommentService {
    /// Creates a new CommentService instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Comments for a post, most recent first, authors resolved
    pub async fn list_for_post(&self, post_id: Uuid) -> CommentServiceResult<Vec<Comment>> {
        self.ensure_post_exists(post_id).await?;

        let sql = format!(
            "{} WHERE c.post_id = $1 GROUP BY c.id, u.id ORDER BY c.created_at DESC",
            COMMENT_WITH_AUTHOR
        );
        let rows = sqlx::query_as::<_, CommentWithAuthorRow>(&sql)
            .bind(post_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    /// Create a comment against an existing post
    pub async fn create(
        &self,
        post_id: Uuid,
        owner_id: Uuid,
        request: CreateCommentRequest,
    ) -> CommentServiceResult<Comment> {
        request.validate().map_err(|e| {
            CommentServiceError::ValidationError(format!("Invalid comment data: {}", e))
        })?;

        self.ensure_post_exists(post_id).await?;

        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO comments (content, author_id, post_id) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(request.content.trim())
        .bind(owner_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        self.fetch_with_author(id).await
    }

    /// Delete a comment; only the owner may do so
    pub async fn delete(&self, id: Uuid, acting_user: Uuid) -> CommentServiceResult<()> {
        let owner: Uuid = sqlx::query_scalar("SELECT author_id FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CommentServiceError::NotFound)?;

        if !can_mutate(owner, acting_user) {
            return Err(CommentServiceError::Forbidden);
        }

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Membership flip on one reaction set, leaving the other untouched
    ///
    /// Same read-then-write discipline as post likes: best-effort under
    /// concurrent toggles, duplicate membership ruled out by the key.
    pub async fn toggle_reaction(
        &self,
        id: Uuid,
        acting_user: Uuid,
        kind: ReactionKind,
    ) -> CommentServiceResult<ReactionStatus> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(CommentServiceError::NotFound);
        }

        let already_active: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM comment_reactions \
             WHERE comment_id = $1 AND user_id = $2 AND reaction = $3)",
        )
        .bind(id)
        .bind(acting_user)
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await?;

        if already_active {
            sqlx::query(
                "DELETE FROM comment_reactions \
                 WHERE comment_id = $1 AND user_id = $2 AND reaction = $3",
            )
            .bind(id)
            .bind(acting_user)
            .bind(kind.as_str())
            .execute(&self.pool)
            .await?;
        } else {
            sqlx::query(
                "INSERT INTO comment_reactions (comment_id, user_id, reaction) \
                 VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(acting_user)
            .bind(kind.as_str())
            .execute(&self.pool)
            .await?;
        }

        let (likes_count, dislikes_count): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE reaction = 'like'), \
                    COUNT(*) FILTER (WHERE reaction = 'dislike') \
             FROM comment_reactions WHERE comment_id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ReactionStatus {
            likes_count,
            dislikes_count,
            is_active: !already_active,
        })
    }

    async fn ensure_post_exists(&self, post_id: Uuid) -> CommentServiceResult<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;

        if !exists {
            return Err(CommentServiceError::PostNotFound);
        }
        Ok(())
    }

    async fn fetch_with_author(&self, id: Uuid) -> CommentServiceResult<Comment> {
        let sql = format!("{} WHERE c.id = $1 GROUP BY c.id, u.id", COMMENT_WITH_AUTHOR);
        let row = sqlx::query_as::<_, CommentWithAuthorRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CommentServiceError::NotFound)?;

        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping_to_failure_taxonomy() {
        let not_found: AppError = CommentServiceError::NotFound.into();
        assert_eq!(not_found.code(), "NOT_FOUND");

        let post_missing: AppError = CommentServiceError::PostNotFound.into();
        assert_eq!(post_missing.code(), "NOT_FOUND");

        let forbidden: AppError = CommentServiceError::Forbidden.into();
        assert_eq!(forbidden.code(), "FORBIDDEN");
    }
}
