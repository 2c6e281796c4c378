//! Authentication Models
//!
//! Token claims and authenticated-context types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in a bearer token
///
/// Self-contained credential: subject user id plus issuance and expiration
/// instants. There is no server-side revocation; the token stays valid for
/// its full lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user id the token is bound to
    pub sub: String,

    /// Issued-at (seconds since epoch)
    pub iat: i64,

    /// Expiration (seconds since epoch)
    pub exp: i64,
}

impl TokenClaims {
    /// Create claims for a user expiring `expires_in` after `now`
    pub fn new(user_id: Uuid, now: DateTime<Utc>, expires_in: Duration) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}
