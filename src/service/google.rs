//! Google Federated Login
//!
//! Verifies provider-signed ID tokens from the Google sign-in widget. The
//! system trusts the provider's assertion instead of a local password.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;
use thiserror::Error;

/// Google's token introspection endpoint
const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Bound on the verification round trip; failure is fatal to the request,
/// never retried.
const VERIFY_TIMEOUT_SECS: u64 = 10;

/// Google verification specific errors
#[derive(Error, Debug)]
pub enum GoogleError {
    /// The credential failed verification (bad signature, wrong audience,
    /// expired, or structurally invalid)
    #[error("Invalid Google credential: {0}")]
    InvalidCredential(String),

    /// The provider could not be reached
    #[error("Google verification request failed: {0}")]
    Transport(String),

    /// HTTP client construction failed
    #[error("HTTP client error: {0}")]
    Configuration(String),
}

/// Identity asserted by a verified Google ID token
#[derive(Debug, Clone)]
pub struct GoogleIdentity {
    /// Provider-scoped stable subject id
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

/// Raw payload of the tokeninfo response
#[derive(Debug, Deserialize)]
struct TokenInfoPayload {
    aud: String,
    sub: String,
    email: String,
    name: Option<String>,
    picture: Option<String>,
}

/// Verifier for Google ID tokens bound to one OAuth client id
pub struct GoogleVerifier {
    http_client: HttpClient,
    client_id: String,
    endpoint: String,
}

impl GoogleVerifier {
    /// Create a verifier for the configured client id
    pub fn new(client_id: String) -> Result<Self, GoogleError> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(VERIFY_TIMEOUT_SECS))
            .build()
            .map_err(|e| GoogleError::Configuration(e.to_string()))?;

        Ok(Self {
            http_client,
            client_id,
            endpoint: TOKENINFO_URL.to_string(),
        })
    }

    /// Verify an ID token and extract the asserted identity
    ///
    /// Google validates the signature and expiration server-side; the
    /// audience check against our client id happens here.
    pub async fn verify(&self, credential: &str) -> Result<GoogleIdentity, GoogleError> {
        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[("id_token", credential)])
            .send()
            .await
            .map_err(|e| GoogleError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GoogleError::InvalidCredential(format!(
                "provider rejected the token (status {})",
                response.status()
            )));
        }

        let payload: TokenInfoPayload = response
            .json()
            .await
            .map_err(|e| GoogleError::InvalidCredential(e.to_string()))?;

        accept_payload(payload, &self.client_id)
    }
}

/// Audience check and field extraction, separated for testability
fn accept_payload(
    payload: TokenInfoPayload,
    client_id: &str,
) -> Result<GoogleIdentity, GoogleError> {
    if payload.aud != client_id {
        return Err(GoogleError::InvalidCredential(
            "token audience does not match the configured client id".to_string(),
        ));
    }

    let name = payload
        .name
        .unwrap_or_else(|| payload.email.clone());

    Ok(GoogleIdentity {
        google_id: payload.sub,
        email: payload.email,
        name,
        picture: payload.picture,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(aud: &str) -> TokenInfoPayload {
        TokenInfoPayload {
            aud: aud.to_string(),
            sub: "108263725447".to_string(),
            email: "a@x.com".to_string(),
            name: Some("A".to_string()),
            picture: Some("https://example.com/p.jpg".to_string()),
        }
    }

    #[test]
    fn test_accepts_matching_audience() {
        let identity = accept_payload(payload("client-123"), "client-123").unwrap();
        assert_eq!(identity.google_id, "108263725447");
        assert_eq!(identity.email, "a@x.com");
        assert_eq!(identity.name, "A");
    }

    #[test]
    fn test_rejects_wrong_audience() {
        let result = accept_payload(payload("someone-else"), "client-123");
        assert!(matches!(result, Err(GoogleError::InvalidCredential(_))));
    }

    #[test]
    fn test_missing_name_falls_back_to_email() {
        let mut p = payload("client-123");
        p.name = None;
        let identity = accept_payload(p, "client-123").unwrap();
        assert_eq!(identity.name, "a@x.com");
    }
}
