//! Security Utilities
//!
//! Password hashing and random-token helpers.

use bcrypt::{hash, verify, DEFAULT_COST};
use rand::{distributions::Alphanumeric, Rng};

/// Default bcrypt cost for password hashing
pub const DEFAULT_BCRYPT_COST: u32 = DEFAULT_COST;

/// Generate a cryptographically secure random string
pub fn generate_secure_token(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash_password_with_cost(password, DEFAULT_BCRYPT_COST)
}

/// Hash a password with custom bcrypt cost
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

/// Random plaintext for accounts created via federated login.
///
/// The hash of this value satisfies the non-null password constraint; the
/// plaintext is discarded, so the password can never be used to log in.
pub fn generate_unusable_password() -> String {
    generate_secure_token(24)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps the hashing tests fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn test_generate_secure_token() {
        let token1 = generate_secure_token(32);
        let token2 = generate_secure_token(32);

        assert_eq!(token1.len(), 32);
        assert_eq!(token2.len(), 32);
        assert_ne!(token1, token2); // Should be different
    }

    #[test]
    fn test_password_hashing_round_trip() {
        let password = "secret1";
        let hashed = hash_password_with_cost(password, TEST_COST).unwrap();

        assert_ne!(hashed, password);
        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_unusable_password_is_random() {
        let a = generate_unusable_password();
        let b = generate_unusable_password();

        assert_eq!(a.len(), 24);
        assert_ne!(a, b);
    }
}
