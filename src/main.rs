//! Blog Service Server
//!
//! Composition root: loads configuration, connects the store, constructs
//! every service once, and serves the full route surface.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use dotenv::dotenv;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use blog_service::{
    api::{AppState, RouterBuilder},
    config::AppConfig,
    database::DatabaseConfig,
    service::{
        AuthService, CommentService, GoogleVerifier, PostService, TokenService, UploadLimits,
        UploadService,
    },
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv().ok();

    env_logger::init();

    log::info!("🚀 Starting blog service v{}", blog_service::VERSION);

    // Load configuration from environment
    let config = AppConfig::from_env()?;
    config.validate()?;

    log::info!("✅ Configuration loaded and validated");

    // Database configuration and connection
    let db_config = DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        connect_timeout: Duration::from_secs(config.database.connect_timeout_seconds),
        ..DatabaseConfig::default()
    };
    let pool = db_config.create_pool().await?;

    log::info!("🔄 Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("✅ Database migrations completed");

    // Token service shared by issuance and the identity resolver
    let token_service = TokenService::with_expiration(
        config.jwt.secret.clone(),
        chrono::Duration::days(config.jwt.expires_days),
    );

    // Optional federated login
    let google_verifier = match &config.google {
        Some(google) => {
            log::info!("✅ Google login enabled");
            Some(GoogleVerifier::new(google.client_id.clone())?)
        }
        None => {
            log::warn!("⚠️  GOOGLE_CLIENT_ID not set; Google login disabled");
            None
        }
    };

    // Upload relay: remote blob store when configured, local disk otherwise
    let limits = UploadLimits {
        max_file_bytes: config.upload.max_file_bytes,
        max_files: config.upload.max_files,
    };
    let serve_local_uploads = config.upload.blob_endpoint.is_none();
    let upload_service = match &config.upload.blob_endpoint {
        Some(endpoint) => {
            log::info!("✅ Upload relay: remote blob store at {}", endpoint);
            UploadService::remote(
                endpoint.clone(),
                config.upload.blob_access_key.clone(),
                Duration::from_secs(config.upload.timeout_seconds),
                limits,
            )?
        }
        None => {
            log::info!(
                "✅ Upload relay: local disk at {}",
                config.upload.dir.display()
            );
            UploadService::local_disk(
                config.upload.dir.clone(),
                config.upload.public_base_url.clone(),
                limits,
            )
        }
    };

    // Application state: every service constructed once, injected everywhere
    let app_state = AppState {
        auth_service: Arc::new(AuthService::new(
            pool.clone(),
            token_service.clone(),
            google_verifier,
        )),
        post_service: Arc::new(PostService::new(pool.clone())),
        comment_service: Arc::new(CommentService::new(pool)),
        upload_service: Arc::new(upload_service),
        token_service,
    };

    log::info!("✅ Services initialized");

    let mut builder = RouterBuilder::with_all_routes();
    if serve_local_uploads {
        builder = builder.serve_uploads(config.upload.dir.clone());
    }

    // Body cap sized from the upload limits, with slack for text fields
    let body_limit = config.upload.max_files * config.upload.max_file_bytes + 1024 * 1024;

    let app = builder.build(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(DefaultBodyLimit::max(body_limit))
            .into_inner(),
    );

    log::info!("📋 API Endpoints:");
    log::info!("   GET  /api/health - Health check");
    log::info!("   POST /api/auth/signup - Create account");
    log::info!("   POST /api/auth/login - Email/password login");
    log::info!("   POST /api/auth/google - Google login");
    log::info!("   GET  /api/auth/me - Current user (token required)");
    log::info!("   GET/POST /api/posts - List/create posts");
    log::info!("   GET/PUT/DELETE /api/posts/:id - Single post");
    log::info!("   POST /api/posts/:id/like - Toggle like");
    log::info!("   GET/POST /api/posts/:id/comments - Comments");
    log::info!("   DELETE /api/comments/:id - Delete comment");
    log::info!("   POST /api/comments/:id/like|dislike - Comment reactions");

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    log::info!("🌐 Server listening on {}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
