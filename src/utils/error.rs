//! Error Handling Utilities
//!
//! The closed failure taxonomy for the blog service and its single mapping
//! to HTTP status codes and the response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type that can represent failures from any feature
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad input shape or content
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing, malformed, or expired bearer token
    #[error("Authentication error: {0}")]
    Unauthenticated(String),

    /// Valid identity, insufficient ownership
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource absent
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Duplicate resource (e.g. an already-registered email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Upload with a mime type outside the image allow-list
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Upload exceeding the per-file size bound
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Transport failure while forwarding a file to blob storage
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing errors
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Server configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Anything unanticipated
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Standard error response body for API endpoints
///
/// `error` is the machine-stable reason code; `message` is a human-readable
/// string and not a stable contract.
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}

impl AppError {
    /// Machine-stable reason code for the response envelope
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthenticated(_) => "UNAUTHENTICATED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::UploadFailed(_) => "UPLOAD_FAILED",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Hashing(_) => "HASHING_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for this failure kind
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UnsupportedMediaType(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UploadFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_)
            | AppError::Hashing(_)
            | AppError::Configuration(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        // Internal detail stays out of responses; the log keeps the specifics.
        let message = match &self {
            AppError::Validation(msg)
            | AppError::Unauthenticated(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::UnsupportedMediaType(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::UploadFailed(msg) => msg.clone(),
            AppError::Database(e) => {
                log::error!("database error: {}", e);
                "A database error occurred".to_string()
            }
            AppError::Hashing(e) => {
                log::error!("password hashing error: {}", e);
                "An internal server error occurred".to_string()
            }
            AppError::Configuration(msg) => {
                log::error!("configuration error: {}", msg);
                "Server configuration error".to_string()
            }
            AppError::Internal(msg) => {
                log::error!("internal error: {}", msg);
                "An internal server error occurred".to_string()
            }
        };

        let body = ErrorResponse::new(code, &message);
        (status, Json(body)).into_response()
    }
}

/// Result type alias for operations that can return AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_creation() {
        let error = ErrorResponse::new("TEST_ERROR", "Test message");
        assert!(!error.success);
        assert_eq!(error.error, "TEST_ERROR");
        assert_eq!(error.message, "Test message");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthenticated("no token".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("not yours".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("gone".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("dup".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::UnsupportedMediaType("pdf".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::PayloadTooLarge("too big".into()).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::UploadFailed("timeout".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_machine_codes_are_stable() {
        assert_eq!(AppError::Validation("x".into()).code(), "VALIDATION_ERROR");
        assert_eq!(
            AppError::Unauthenticated("x".into()).code(),
            "UNAUTHENTICATED"
        );
        assert_eq!(AppError::Forbidden("x".into()).code(), "FORBIDDEN");
        assert_eq!(AppError::NotFound("x".into()).code(), "NOT_FOUND");
        assert_eq!(AppError::Conflict("x".into()).code(), "CONFLICT");
        assert_eq!(AppError::UploadFailed("x".into()).code(), "UPLOAD_FAILED");
    }

    #[test]
    fn test_app_error_display() {
        let error = AppError::Validation("Invalid email".to_string());
        assert_eq!(error.to_string(), "Validation error: Invalid email");
    }
}
