//! Post Handlers
//!
//! CRUD plus like toggle. Create and update accept JSON or multipart bodies;
//! parsed files go through the upload relay before the post service runs.

use axum::{extract::State, http::StatusCode, Extension, Json};
use uuid::Uuid;

use crate::api::extract::{AppPath, PostPayload};
use crate::api::handlers::{ApiResponse, AppState};
use crate::api::middleware::CurrentUser;
use crate::models::requests::{PostData, PostDetailData, PostListData, PostPatch};
use crate::models::LikeStatus;
use crate::utils::error::{AppError, AppResult};
use crate::utils::validation::is_blank;

/// `GET /api/posts`
pub async fn list_posts(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<PostListData>>> {
    let posts = state.post_service.list().await?;
    let count = posts.len();

    Ok(Json(ApiResponse::data(PostListData { posts, count })))
}

/// `GET /api/posts/{id}`
pub async fn get_post(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<PostDetailData>>> {
    let post = state.post_service.get(id).await?;

    Ok(Json(ApiResponse::data(PostDetailData { post })))
}

/// `POST /api/posts`
///
/// Request shape is validated before any image is persisted, and the upload
/// relay's all-or-nothing admission runs before the first write.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: PostPayload,
) -> AppResult<(StatusCode, Json<ApiResponse<PostData>>)> {
    let title = payload.title.as_deref().unwrap_or_default();
    let content = payload.content.as_deref().unwrap_or_default();
    if is_blank(title) || is_blank(content) {
        return Err(AppError::Validation(
            "Title and content are both required".into(),
        ));
    }

    let images = state.upload_service.store_all(&payload.images).await?;

    let post = state
        .post_service
        .create(user.id, title, content, images)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Post created", PostData { post })),
    ))
}

/// `PUT /api/posts/{id}`
///
/// Partial update: only non-empty fields overwrite existing values.
pub async fn update_post(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: PostPayload,
) -> AppResult<Json<ApiResponse<PostData>>> {
    let patch = PostPatch {
        title: payload.title,
        content: payload.content,
    };

    let post = state.post_service.update(id, user.id, patch).await?;

    Ok(Json(ApiResponse::with_message("Post updated", PostData { post })))
}

/// `DELETE /api/posts/{id}`
pub async fn delete_post(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.post_service.delete(id, user.id).await?;

    Ok(Json(ApiResponse::message("Post deleted")))
}

/// `POST /api/posts/{id}/like`
pub async fn toggle_post_like(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<LikeStatus>>> {
    let status = state.post_service.toggle_like(id, user.id).await?;

    let message = if status.is_liked {
        "Post liked"
    } else {
        "Like removed"
    };

    Ok(Json(ApiResponse::with_message(message, status)))
}
