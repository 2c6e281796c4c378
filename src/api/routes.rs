//! API Route Definitions
//!
//! All HTTP routes are assembled through a builder with route-group toggles,
//! so deployments can expose only the surface they need (read-only mirrors,
//! auth-less previews, monitoring probes). Protected groups get the identity
//! resolver applied exactly once, here.

use std::path::PathBuf;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use super::auth_handlers::{google_login, login, me, signup};
use super::comment_handlers::{
    create_comment, delete_comment, dislike_comment, like_comment, list_comments,
};
use super::handlers::{health_check, AppState};
use super::middleware::auth_middleware;
use super::post_handlers::{
    create_post, delete_post, get_post, list_posts, toggle_post_like, update_post,
};

/// Builder for creating API routes with configurable endpoint groups
#[derive(Default)]
pub struct RouterBuilder {
    /// Whether to enable the health check endpoint (GET /api/health)
    health_check: bool,
    /// Whether to enable signup/login/google/me (POST+GET /api/auth/...)
    auth_routes: bool,
    /// Whether to enable post CRUD and like toggles (/api/posts...)
    post_routes: bool,
    /// Whether to enable comment routes (/api/posts/{id}/comments, /api/comments/...)
    comment_routes: bool,
    /// Directory to serve under /uploads (local-disk upload backend)
    uploads_dir: Option<PathBuf>,
}

impl RouterBuilder {
    /// Creates a new router builder with all route groups disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router builder with every route group enabled
    pub fn with_all_routes() -> Self {
        Self {
            health_check: true,
            auth_routes: true,
            post_routes: true,
            comment_routes: true,
            uploads_dir: None,
        }
    }

    /// Creates a router with only the health check endpoint
    ///
    /// Useful for monitoring probes or as a base configuration when you
    /// want to add only specific groups.
    pub fn with_minimal_routes() -> Self {
        Self {
            health_check: true,
            auth_routes: false,
            post_routes: false,
            comment_routes: false,
            uploads_dir: None,
        }
    }

    /// Enables or disables the health check endpoint
    pub fn health_check(mut self, enabled: bool) -> Self {
        self.health_check = enabled;
        self
    }

    /// Enables or disables the auth route group
    pub fn auth_routes(mut self, enabled: bool) -> Self {
        self.auth_routes = enabled;
        self
    }

    /// Enables or disables the post route group
    pub fn post_routes(mut self, enabled: bool) -> Self {
        self.post_routes = enabled;
        self
    }

    /// Enables or disables the comment route group
    pub fn comment_routes(mut self, enabled: bool) -> Self {
        self.comment_routes = enabled;
        self
    }

    /// Serve uploaded files from `dir` under the /uploads prefix
    pub fn serve_uploads(mut self, dir: impl Into<PathBuf>) -> Self {
        self.uploads_dir = Some(dir.into());
        self
    }

    /// Builds the router with the configured groups and applies `state`
    ///
    /// Only the write side of posts/comments and `GET /api/auth/me` sit
    /// behind the identity resolver; listings and single-post reads are
    /// public, as is the whole auth issuance surface.
    pub fn build(self, state: AppState) -> Router {
        let mut public = Router::new();

        if self.health_check {
            public = public.route("/api/health", get(health_check));
        }

        if self.auth_routes {
            public = public
                .route("/api/auth/signup", post(signup))
                .route("/api/auth/login", post(login))
                .route("/api/auth/google", post(google_login));
        }

        if self.post_routes {
            public = public
                .route("/api/posts", get(list_posts))
                .route("/api/posts/{id}", get(get_post));
        }

        if self.comment_routes {
            public = public.route("/api/posts/{id}/comments", get(list_comments));
        }

        let mut protected = Router::new();

        if self.auth_routes {
            protected = protected.route("/api/auth/me", get(me));
        }

        if self.post_routes {
            protected = protected
                .route("/api/posts", post(create_post))
                .route("/api/posts/{id}", put(update_post))
                .route("/api/posts/{id}", delete(delete_post))
                .route("/api/posts/{id}/like", post(toggle_post_like));
        }

        if self.comment_routes {
            protected = protected
                .route("/api/posts/{id}/comments", post(create_comment))
                .route("/api/comments/{id}", delete(delete_comment))
                .route("/api/comments/{id}/like", post(like_comment))
                .route("/api/comments/{id}/dislike", post(dislike_comment));
        }

        // route_layer panics on a router with no routes; only attach the
        // identity resolver when a protected group is enabled.
        let any_protected = self.auth_routes || self.post_routes || self.comment_routes;
        let mut router = if any_protected {
            let protected =
                protected.route_layer(from_fn_with_state(state.clone(), auth_middleware));
            public.merge(protected)
        } else {
            public
        };

        if let Some(dir) = self.uploads_dir {
            router = router.nest_service("/uploads", ServeDir::new(dir));
        }

        router.with_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builder starts with every group disabled
    #[test]
    fn test_router_builder_new() {
        let builder = RouterBuilder::new();

        assert!(!builder.health_check);
        assert!(!builder.auth_routes);
        assert!(!builder.post_routes);
        assert!(!builder.comment_routes);
        assert!(builder.uploads_dir.is_none());
    }

    /// with_all_routes() enables every group
    #[test]
    fn test_router_builder_with_all_routes() {
        let builder = RouterBuilder::with_all_routes();

        assert!(builder.health_check);
        assert!(builder.auth_routes);
        assert!(builder.post_routes);
        assert!(builder.comment_routes);
    }

    /// with_minimal_routes() enables only the health check
    #[test]
    fn test_router_builder_with_minimal_routes() {
        let builder = RouterBuilder::with_minimal_routes();

        assert!(builder.health_check);
        assert!(!builder.auth_routes);
        assert!(!builder.post_routes);
        assert!(!builder.comment_routes);
    }

    /// Individual toggles compose
    #[test]
    fn test_router_builder_individual_methods() {
        let builder = RouterBuilder::new()
            .health_check(true)
            .auth_routes(true)
            .post_routes(false)
            .comment_routes(true)
            .serve_uploads("uploads");

        assert!(builder.health_check);
        assert!(builder.auth_routes);
        assert!(!builder.post_routes);
        assert!(builder.comment_routes);
        assert_eq!(builder.uploads_dir.as_deref(), Some("uploads".as_ref()));
    }
}
