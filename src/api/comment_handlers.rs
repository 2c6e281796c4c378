//! Comment Handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use uuid::Uuid;

use crate::api::extract::{AppJson, AppPath};
use crate::api::handlers::{ApiResponse, AppState};
use crate::api::middleware::CurrentUser;
use crate::models::requests::{CommentData, CommentListData, CreateCommentRequest};
use crate::models::{ReactionKind, ReactionStatus};
use crate::utils::error::AppResult;

/// `GET /api/posts/{id}/comments`
pub async fn list_comments(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<CommentListData>>> {
    let comments = state.comment_service.list_for_post(id).await?;
    let count = comments.len();

    Ok(Json(ApiResponse::data(CommentListData { comments, count })))
}

/// `POST /api/posts/{id}/comments`
pub async fn create_comment(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    AppJson(request): AppJson<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CommentData>>)> {
    let comment = state.comment_service.create(id, user.id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Comment created",
            CommentData { comment },
        )),
    ))
}

/// `DELETE /api/comments/{id}`
pub async fn delete_comment(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.comment_service.delete(id, user.id).await?;

    Ok(Json(ApiResponse::message("Comment deleted")))
}

/// `POST /api/comments/{id}/like`
pub async fn like_comment(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<ReactionStatus>>> {
    toggle_reaction(state, id, user.id, ReactionKind::Like).await
}

/// `POST /api/comments/{id}/dislike`
pub async fn dislike_comment(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<ReactionStatus>>> {
    toggle_reaction(state, id, user.id, ReactionKind::Dislike).await
}

async fn toggle_reaction(
    state: AppState,
    id: Uuid,
    user_id: Uuid,
    kind: ReactionKind,
) -> AppResult<Json<ApiResponse<ReactionStatus>>> {
    let status = state
        .comment_service
        .toggle_reaction(id, user_id, kind)
        .await?;

    let message = match (kind, status.is_active) {
        (ReactionKind::Like, true) => "Comment liked",
        (ReactionKind::Like, false) => "Like removed",
        (ReactionKind::Dislike, true) => "Comment disliked",
        (ReactionKind::Dislike, false) => "Dislike removed",
    };

    Ok(Json(ApiResponse::with_message(message, status)))
}
