//! Post Service
//!
//! Create/read/update/delete and like-toggle operations over posts, with the
//! ownership guard applied before every mutation.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    post::{LikeStatus, Post, PostDetail, PostWithAuthorRow},
    requests::PostPatch,
    user::Author,
};
use crate::service::ownership::can_mutate;
use crate::utils::error::AppError;
use crate::utils::validation::{is_blank, MAX_TITLE_LEN};

/// Custom error types for the post service
#[derive(Error, Debug)]
pub enum PostServiceError {
    /// Post with the specified identifier was not found
    #[error("Post not found")]
    NotFound,

    /// Acting user does not own the post
    #[error("Only the author can modify this post")]
    Forbidden,

    /// Input validation failed with detailed error message
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<PostServiceError> for AppError {
    fn from(err: PostServiceError) -> Self {
        match err {
            PostServiceError::NotFound => AppError::NotFound("Post not found".to_string()),
            PostServiceError::Forbidden => {
                AppError::Forbidden("Only the author can modify this post".to_string())
            }
            PostServiceError::ValidationError(msg) => AppError::Validation(msg),
            PostServiceError::DatabaseError(e) => AppError::Database(e),
        }
    }
}

/// Result type for post service operations
pub type PostServiceResult<T> = Result<T, PostServiceError>;

/// Select list for a post joined with its author and aggregated like set
const POST_WITH_AUTHOR: &str = r#"
SELECT p.id, p.title, p.content, p.images, p.created_at, p.updated_at,
       u.id AS author_id, u.name AS author_name, u.email AS author_email,
       COALESCE(array_agg(pl.user_id) FILTER (WHERE pl.user_id IS NOT NULL),
                ARRAY[]::uuid[]) AS like_user_ids
FROM posts p
JOIN users u ON u.id = p.author_id
LEFT JOIN post_likes pl ON pl.post_id = p.id
"#;

/// Post service providing CRUD and like-toggle operations
pub struct PostService {
    /// Database connection pool, injected by the composition root
    pool: PgPool,
}

impl PostService {
    /// Creates a new PostService instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a post owned by `owner_id` with already-stored image URLs
    pub async fn create(
        &self,
        owner_id: Uuid,
        title: &str,
        content: &str,
        images: Vec<String>,
    ) -> PostServiceResult<Post> {
        if is_blank(title) || is_blank(content) {
            return Err(PostServiceError::ValidationError(
                "Title and content are both required".to_string(),
            ));
        }
        let title = title.trim();
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(PostServiceError::ValidationError(format!(
                "Title must be at most {} characters",
                MAX_TITLE_LEN
            )));
        }

        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO posts (title, content, images, author_id) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(title)
        .bind(content)
        .bind(&images)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        log::info!("post created: {} by {}", id, owner_id);
        self.fetch_with_author(id).await
    }

    /// All posts, most recently created first, authors resolved
    pub async fn list(&self) -> PostServiceResult<Vec<Post>> {
        let sql = format!(
            "{} GROUP BY p.id, u.id ORDER BY p.created_at DESC",
            POST_WITH_AUTHOR
        );
        let rows = sqlx::query_as::<_, PostWithAuthorRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    /// One post with author and liking users resolved to display fields
    pub async fn get(&self, id: Uuid) -> PostServiceResult<PostDetail> {
        let post = self.fetch_with_author(id).await?;

        let liked_by = sqlx::query_as::<_, Author>(
            "SELECT u.id, u.name, u.email FROM post_likes pl \
             JOIN users u ON u.id = pl.user_id \
             WHERE pl.post_id = $1 ORDER BY pl.created_at",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(PostDetail {
            id: post.id,
            title: post.title,
            content: post.content,
            images: post.images,
            author: post.author,
            likes_count: liked_by.len() as i64,
            liked_by,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
    }

    /// Apply non-empty patch fields; empty or absent fields keep their value
    ///
    /// Read-modify-write without a transaction: the guard check and the
    /// update may interleave with concurrent requests (documented relaxed
    /// consistency).
    pub async fn update(
        &self,
        id: Uuid,
        acting_user: Uuid,
        patch: PostPatch,
    ) -> PostServiceResult<Post> {
        let patch = patch.normalized();

        if let Some(title) = patch.title.as_deref() {
            if title.trim().chars().count() > MAX_TITLE_LEN {
                return Err(PostServiceError::ValidationError(format!(
                    "Title must be at most {} characters",
                    MAX_TITLE_LEN
                )));
            }
        }

        self.guard_owner(id, acting_user).await?;

        sqlx::query(
            "UPDATE posts SET \
                 title = COALESCE($2, title), \
                 content = COALESCE($3, content), \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(patch.title.as_deref().map(str::trim))
        .bind(patch.content.as_deref())
        .execute(&self.pool)
        .await?;

        self.fetch_with_author(id).await
    }

    /// Delete a post; likes and comments cascade in the store
    pub async fn delete(&self, id: Uuid, acting_user: Uuid) -> PostServiceResult<()> {
        self.guard_owner(id, acting_user).await?;

        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        log::info!("post deleted: {} by {}", id, acting_user);
        Ok(())
    }

    /// Membership flip on the like set: present removes, absent adds
    ///
    /// Read-then-write without a compare-and-swap; two concurrent toggles by
    /// the same user can race. Best-effort by design, the primary key still
    /// rules out duplicate membership.
    pub async fn toggle_like(&self, id: Uuid, acting_user: Uuid) -> PostServiceResult<LikeStatus> {
        self.ensure_exists(id).await?;

        let already_liked: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM post_likes WHERE post_id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(acting_user)
        .fetch_one(&self.pool)
        .await?;

        if already_liked {
            sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
                .bind(id)
                .bind(acting_user)
                .execute(&self.pool)
                .await?;
        } else {
            sqlx::query(
                "INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(acting_user)
            .execute(&self.pool)
            .await?;
        }

        let likes_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(LikeStatus {
            likes_count,
            is_liked: !already_liked,
        })
    }

    /// 404 if the post is missing, 403 if the acting user is not the owner
    async fn guard_owner(&self, id: Uuid, acting_user: Uuid) -> PostServiceResult<()> {
        let owner: Uuid = sqlx::query_scalar("SELECT author_id FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(PostServiceError::NotFound)?;

        if !can_mutate(owner, acting_user) {
            return Err(PostServiceError::Forbidden);
        }
        Ok(())
    }

    async fn ensure_exists(&self, id: Uuid) -> PostServiceResult<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if !exists {
            return Err(PostServiceError::NotFound);
        }
        Ok(())
    }

    async fn fetch_with_author(&self, id: Uuid) -> PostServiceResult<Post> {
        let sql = format!("{} WHERE p.id = $1 GROUP BY p.id, u.id", POST_WITH_AUTHOR);
        let row = sqlx::query_as::<_, PostWithAuthorRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(PostServiceError::NotFound)?;

        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping_to_failure_taxonomy() {
        let not_found: AppError = PostServiceError::NotFound.into();
        assert_eq!(not_found.code(), "NOT_FOUND");

        let forbidden: AppError = PostServiceError::Forbidden.into();
        assert_eq!(forbidden.code(), "FORBIDDEN");

        let validation: AppError =
            PostServiceError::ValidationError("Title and content are both required".into()).into();
        assert_eq!(validation.code(), "VALIDATION_ERROR");
    }
}
