//! Token Service
//!
//! Issues and verifies the signed, self-contained bearer tokens that are the
//! sole authentication proof. Tokens are never persisted and cannot be
//! revoked before their expiration.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use uuid::Uuid;

use crate::models::TokenClaims;
use crate::utils::error::AppError;

/// Default token lifetime
const DEFAULT_EXPIRES_DAYS: i64 = 30;

/// Token service specific errors
#[derive(Error, Debug)]
pub enum TokenError {
    /// Signature mismatch, structural corruption, or expiration. The kinds
    /// are deliberately not distinguished at this boundary.
    #[error("Invalid or expired token")]
    Invalid,

    /// Token construction failed
    #[error("Token generation error: {0}")]
    Generation(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => AppError::Unauthenticated("Invalid or expired token".into()),
            TokenError::Generation(msg) => {
                AppError::Internal(format!("Token generation error: {}", msg))
            }
        }
    }
}

/// Result type for token operations
pub type TokenResult<T> = Result<T, TokenError>;

/// Stateless issuer/verifier for HS256 bearer tokens
#[derive(Clone)]
pub struct TokenService {
    /// Signing secret
    secret: String,
    /// Token lifetime (default: 30 days)
    expires_in: Duration,
}

impl TokenService {
    /// Create a new token service with the default 30-day lifetime
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            expires_in: Duration::days(DEFAULT_EXPIRES_DAYS),
        }
    }

    /// Create a token service with a custom lifetime
    pub fn with_expiration(secret: String, expires_in: Duration) -> Self {
        Self { secret, expires_in }
    }

    /// Produce a signed token embedding `user_id` and the expiration
    pub fn issue(&self, user_id: Uuid) -> TokenResult<String> {
        let claims = TokenClaims::new(user_id, Utc::now(), self.expires_in);
        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(self.secret.as_ref());

        encode(&header, &claims, &encoding_key).map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Check signature and expiration, returning the embedded user id
    ///
    /// Failure is never retried; callers surface it as an authentication
    /// failure.
    pub fn verify(&self, token: &str) -> TokenResult<Uuid> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;

        let decoding_key = DecodingKey::from_secret(self.secret.as_ref());

        let claims = decode::<TokenClaims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)?;

        claims.user_id().map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> TokenService {
        TokenService::new("test_secret_key".to_string())
    }

    #[test]
    fn test_issue_then_verify_round_trip() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id).unwrap();
        let verified = service.verify(&token).unwrap();

        assert_eq!(verified, user_id);
    }

    #[test]
    fn test_verify_rejects_forged_signature() {
        let service = create_test_service();
        let other = TokenService::new("a_different_secret".to_string());
        let token = other.issue(Uuid::new_v4()).unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let service = TokenService::with_expiration(
            "test_secret_key".to_string(),
            Duration::seconds(-120),
        );
        let token = service.issue(Uuid::new_v4()).unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_verify_rejects_structural_garbage() {
        let service = create_test_service();

        assert!(matches!(
            service.verify("not.a.token"),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(service.verify(""), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_failures_collapse_to_single_kind() {
        let service = create_test_service();
        let expired = TokenService::with_expiration(
            "test_secret_key".to_string(),
            Duration::seconds(-120),
        )
        .issue(Uuid::new_v4())
        .unwrap();

        // Expired and malformed are indistinguishable at this boundary.
        let a = service.verify(&expired).unwrap_err();
        let b = service.verify("garbage").unwrap_err();
        assert_eq!(a.to_string(), b.to_string());
    }
}
