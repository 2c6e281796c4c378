//! Blog Service Library
//!
//! REST API backend for a personal blogging application: account signup and
//! login, federated Google login, bearer-token authentication, post and
//! comment CRUD with like toggles, and image upload to local disk or a
//! remote blob store.
//!
//! # Features
//!
//! - **Bearer-token auth**: signed, self-contained 30-day tokens; one
//!   identity-resolver middleware in front of every protected route
//! - **Ownership enforcement**: only a resource's creator may mutate or
//!   delete it
//! - **Password security**: bcrypt hashing; hashes never leave the store
//!   layer
//! - **Image uploads**: multipart parsing with all-or-nothing admission
//!   (count, mime allow-list, size bound) before anything is persisted
//! - **Uniform envelope**: every response is `{success, message?, data?}`,
//!   failures carry a machine-stable reason code
//! - **Flexible Router**: configurable endpoint groups via the RouterBuilder
//!   pattern
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use blog_service::{
//!     api::{AppState, RouterBuilder},
//!     database::DatabaseConfig,
//!     service::{
//!         AuthService, CommentService, PostService, TokenService, UploadLimits, UploadService,
//!     },
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = DatabaseConfig::from_env()?.create_pool().await?;
//!     let token_service = TokenService::new("change-me".to_string());
//!
//!     let app_state = AppState {
//!         auth_service: Arc::new(AuthService::new(pool.clone(), token_service.clone(), None)),
//!         post_service: Arc::new(PostService::new(pool.clone())),
//!         comment_service: Arc::new(CommentService::new(pool)),
//!         upload_service: Arc::new(UploadService::local_disk(
//!             "uploads",
//!             "/uploads",
//!             UploadLimits::default(),
//!         )),
//!         token_service,
//!     };
//!
//!     let app = RouterBuilder::with_all_routes()
//!         .serve_uploads("uploads")
//!         .build(app_state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **API Layer**: handlers, route builder, extractors, and the identity
//!   resolver middleware
//! - **Service Layer**: auth, token, post, comment, and upload services plus
//!   the pure ownership guard
//! - **Models**: store rows and request/response structures
//! - **Database**: connection management
//! - **Utils**: error taxonomy, hashing, validation

/// HTTP API layer with handlers and configurable routing
pub mod api;

/// Configuration management for all service settings
pub mod config;

/// Database connection management and configuration
pub mod database;

/// Data models and request/response structures
pub mod models;

/// Business logic: auth, tokens, resources, uploads
pub mod service;

/// Shared utilities for security, validation, and error handling
pub mod utils;

// Re-export commonly used types for convenient access
pub use api::{ApiResponse, AppState, CurrentUser, RouterBuilder};
pub use config::{AppConfig, ConfigError};
pub use database::{DatabaseConfig, DatabasePool};
pub use models::{
    requests::{
        AuthData, CreateCommentRequest, GoogleLoginRequest, LoginRequest, PostPatch,
        SignupRequest,
    },
    Author, Comment, LikeStatus, Post, PostDetail, ReactionKind, ReactionStatus, User,
};
pub use service::{
    AuthService, CommentService, GoogleVerifier, PostService, TokenService, UploadLimits,
    UploadService,
};
pub use utils::error::{AppError, AppResult, ErrorResponse};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
