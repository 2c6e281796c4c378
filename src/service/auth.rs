//! Auth Service
//!
//! Credential-store operations: signup, login, federated Google login, and
//! current-user lookup. Token issuance is delegated to the token service.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    requests::{GoogleLoginRequest, LoginRequest, SignupRequest},
    user::{User, UserWithPassword},
};
use crate::service::google::{GoogleError, GoogleVerifier};
use crate::service::token::{TokenError, TokenService};
use crate::utils::{
    error::AppError,
    security::{
        generate_unusable_password, hash_password_with_cost, verify_password, DEFAULT_BCRYPT_COST,
    },
    validation::normalize_email,
};

/// Custom error types for the auth service
#[derive(Error, Debug)]
pub enum AuthServiceError {
    /// Attempted to create a user with an email that already exists
    #[error("Email already in use")]
    EmailAlreadyExists,

    /// Invalid login credentials provided
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// User behind a valid token no longer exists
    #[error("User not found")]
    UserNotFound,

    /// Input validation failed with detailed error message
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Federated login attempted without a configured client id
    #[error("Google login is not configured")]
    GoogleNotConfigured,

    /// Federated credential failed verification or transport
    #[error("Google verification error: {0}")]
    Google(#[from] GoogleError),

    /// Token construction failed
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Password hashing operation failed
    #[error("Password hashing error: {0}")]
    HashingError(#[from] bcrypt::BcryptError),
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::EmailAlreadyExists => {
                AppError::Conflict("Email already in use".to_string())
            }
            AuthServiceError::InvalidCredentials => {
                AppError::Unauthenticated("Invalid email or password".to_string())
            }
            AuthServiceError::UserNotFound => AppError::NotFound("User not found".to_string()),
            AuthServiceError::ValidationError(msg) => AppError::Validation(msg),
            AuthServiceError::GoogleNotConfigured => {
                AppError::Configuration("Google login is not configured".to_string())
            }
            AuthServiceError::Google(GoogleError::InvalidCredential(msg)) => {
                AppError::Unauthenticated(format!("Invalid Google credential: {}", msg))
            }
            AuthServiceError::Google(e) => AppError::Internal(e.to_string()),
            AuthServiceError::Token(e) => e.into(),
            AuthServiceError::DatabaseError(e) => AppError::Database(e),
            AuthServiceError::HashingError(e) => AppError::Hashing(e),
        }
    }
}

/// Result type for auth service operations
pub type AuthServiceResult<T> = Result<T, AuthServiceError>;

const USER_COLUMNS: &str =
    "id, email, password_hash, name, google_id, profile_picture_url, created_at";

/// Credential-store service backing the auth routes
pub struct AuthService {
    /// Database connection pool, injected by the composition root
    pool: PgPool,

    /// Token issuer shared with the identity-resolver middleware
    token_service: TokenService,

    /// Federated-login verifier; absent when no client id is configured
    google_verifier: Option<GoogleVerifier>,

    /// bcrypt cost factor for password hashing
    bcrypt_cost: u32,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(
        pool: PgPool,
        token_service: TokenService,
        google_verifier: Option<GoogleVerifier>,
    ) -> Self {
        Self {
            pool,
            token_service,
            google_verifier,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    /// Create a new account and issue its first token
    pub async fn signup(&self, request: SignupRequest) -> AuthServiceResult<(User, String)> {
        request
            .validate()
            .map_err(|e| AuthServiceError::ValidationError(format!("Invalid signup data: {}", e)))?;

        let normalized_email = normalize_email(&request.email);
        let password_hash = hash_password_with_cost(&request.password, self.bcrypt_cost)?;

        let sql = format!(
            "INSERT INTO users (email, password_hash, name) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, UserWithPassword>(&sql)
            .bind(&normalized_email)
            .bind(&password_hash)
            .bind(request.name.trim())
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique_email_violation)?;

        let user: User = user.into();
        let token = self.token_service.issue(user.id)?;

        log::info!("new account created: {}", user.email);
        Ok((user, token))
    }

    /// Verify email/password and issue a token
    ///
    /// Unknown email and wrong password produce the same failure so the
    /// response does not reveal which accounts exist.
    pub async fn login(&self, request: LoginRequest) -> AuthServiceResult<(User, String)> {
        request
            .validate()
            .map_err(|e| AuthServiceError::ValidationError(format!("Invalid login data: {}", e)))?;

        let normalized_email = normalize_email(&request.email);

        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, UserWithPassword>(&sql)
            .bind(&normalized_email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        let is_match = verify_password(&request.password, &user.password_hash)?;
        if !is_match {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let user: User = user.into();
        let token = self.token_service.issue(user.id)?;

        log::info!("login: {}", user.email);
        Ok((user, token))
    }

    /// Verify a Google credential, creating the account on first sight
    ///
    /// A pre-existing account for the same email gets the federated fields
    /// attached once; accounts created here store an unusable random
    /// password hash to satisfy the non-null constraint.
    pub async fn google_login(
        &self,
        request: GoogleLoginRequest,
    ) -> AuthServiceResult<(User, String)> {
        request.validate().map_err(|e| {
            AuthServiceError::ValidationError(format!("Invalid Google login data: {}", e))
        })?;

        let verifier = self
            .google_verifier
            .as_ref()
            .ok_or(AuthServiceError::GoogleNotConfigured)?;

        let identity = verifier.verify(&request.credential).await?;
        let normalized_email = normalize_email(&identity.email);

        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let existing = sqlx::query_as::<_, UserWithPassword>(&sql)
            .bind(&normalized_email)
            .fetch_optional(&self.pool)
            .await?;

        let user: User = match existing {
            Some(user) if user.google_id.is_some() => user.into(),
            Some(user) => {
                // First federated login for a password account: attach the
                // provider identity.
                let sql = format!(
                    "UPDATE users SET google_id = $2, profile_picture_url = $3 \
                     WHERE id = $1 RETURNING {}",
                    USER_COLUMNS
                );
                let updated = sqlx::query_as::<_, UserWithPassword>(&sql)
                    .bind(user.id)
                    .bind(&identity.google_id)
                    .bind(&identity.picture)
                    .fetch_one(&self.pool)
                    .await?;
                log::info!("linked Google identity to existing account: {}", normalized_email);
                updated.into()
            }
            None => {
                let password_hash =
                    hash_password_with_cost(&generate_unusable_password(), self.bcrypt_cost)?;
                let sql = format!(
                    "INSERT INTO users (email, password_hash, name, google_id, profile_picture_url) \
                     VALUES ($1, $2, $3, $4, $5) RETURNING {}",
                    USER_COLUMNS
                );
                let created = sqlx::query_as::<_, UserWithPassword>(&sql)
                    .bind(&normalized_email)
                    .bind(&password_hash)
                    .bind(&identity.name)
                    .bind(&identity.google_id)
                    .bind(&identity.picture)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_unique_email_violation)?;
                log::info!("new Google account created: {}", normalized_email);
                created.into()
            }
        };

        let token = self.token_service.issue(user.id)?;
        Ok((user, token))
    }

    /// Fetch the user record behind a verified token subject
    pub async fn current_user(&self, user_id: Uuid) -> AuthServiceResult<User> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, UserWithPassword>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        Ok(user.into())
    }

    /// Store connectivity probe for the health endpoint
    pub async fn health_check(&self) -> AuthServiceResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Map the users_email_key unique violation to the Conflict failure kind
fn map_unique_email_violation(e: sqlx::Error) -> AuthServiceError {
    match e {
        sqlx::Error::Database(db_err) if db_err.constraint() == Some("users_email_key") => {
            AuthServiceError::EmailAlreadyExists
        }
        other => AuthServiceError::DatabaseError(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping_to_failure_taxonomy() {
        let conflict: AppError = AuthServiceError::EmailAlreadyExists.into();
        assert_eq!(conflict.code(), "CONFLICT");

        let unauthenticated: AppError = AuthServiceError::InvalidCredentials.into();
        assert_eq!(unauthenticated.code(), "UNAUTHENTICATED");

        // Valid token whose subject has no record resolves to 404, uniformly.
        let not_found: AppError = AuthServiceError::UserNotFound.into();
        assert_eq!(not_found.code(), "NOT_FOUND");

        let invalid_credential: AppError =
            AuthServiceError::Google(GoogleError::InvalidCredential("aud".into())).into();
        assert_eq!(invalid_credential.code(), "UNAUTHENTICATED");
    }
}
