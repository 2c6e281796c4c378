//! API Layer
//!
//! HTTP endpoints, request extraction, and the identity-resolver middleware.

pub mod auth_handlers;
pub mod comment_handlers;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod post_handlers;
pub mod routes;

// Re-export commonly used types
pub use extract::{AppJson, AppPath, PostPayload};
pub use handlers::{ApiResponse, AppState};
pub use middleware::{auth_middleware, CurrentUser};
pub use routes::RouterBuilder;
