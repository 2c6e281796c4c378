//! HTTP Request Handlers
//!
//! Shared application state, the success envelope, and the health endpoint.
//! Feature handlers live in the auth/post/comment handler modules.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::models::requests::HealthData;
use crate::service::{AuthService, CommentService, PostService, TokenService, UploadService};
use crate::utils::error::AppResult;
use crate::VERSION;

/// Application state shared across handlers
///
/// Every service is constructed once at the composition root and injected
/// here; there is no module-level singleton anywhere.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub post_service: Arc<PostService>,
    pub comment_service: Arc<CommentService>,
    pub upload_service: Arc<UploadService>,
    pub token_service: TokenService,
}

/// Standard success response wrapper
///
/// Every success is `{success: true, message?, data?}`; failures carry the
/// same `success` flag plus a machine-stable reason (see `utils::error`).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Acknowledgement without a data payload (deletes)
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Health check endpoint
pub async fn health_check(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<HealthData>>> {
    // Probes store connectivity; a down store degrades to a 500, never a
    // process crash.
    state.auth_service.health_check().await?;

    let data = HealthData {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: VERSION.to_string(),
    };

    Ok(Json(ApiResponse::data(data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_shape() {
        let response = ApiResponse::data("payload");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "payload");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_message_only_response_omits_data() {
        let response = ApiResponse::message("Post deleted");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Post deleted");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_response_with_message_and_data() {
        let response = ApiResponse::with_message("Created", 42);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Created");
        assert_eq!(json["data"], 42);
    }
}
