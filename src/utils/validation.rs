//! Validation Utilities
//!
//! Input validation functions for user data and API requests.

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

/// Maximum display-name length
pub const MAX_NAME_LEN: usize = 50;

/// Maximum post title length
pub const MAX_TITLE_LEN: usize = 100;

/// Maximum comment length
pub const MAX_COMMENT_LEN: usize = 500;

/// Validates email address format using a comprehensive regex pattern
pub fn validate_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    regex.is_match(email)
}

/// Normalizes email address to lowercase and removes whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates that a display name is non-blank and within the length bound
pub fn validate_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= MAX_NAME_LEN
}

/// True if the string is empty or whitespace-only
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Custom validator for email fields using the validator crate
pub fn email_validator(email: &str) -> Result<(), ValidationError> {
    if validate_email(email) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_email"))
    }
}

/// Custom validator for name fields using the validator crate
pub fn name_validator(name: &str) -> Result<(), ValidationError> {
    if validate_name(name) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_name"))
    }
}

/// Custom validator for comment content: non-blank and within the bound
pub fn comment_content_validator(content: &str) -> Result<(), ValidationError> {
    if is_blank(content) {
        return Err(ValidationError::new("blank_content"));
    }
    if content.trim().chars().count() > MAX_COMMENT_LEN {
        return Err(ValidationError::new("content_too_long"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("test.user+tag@domain.co.uk"));
        assert!(!validate_email("invalid.email"));
        assert!(!validate_email("@domain.com"));
        assert!(!validate_email("user@"));
        assert!(!validate_email(""));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  USER@EXAMPLE.COM  "), "user@example.com");
        assert_eq!(normalize_email("Test@Domain.org"), "test@domain.org");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("John Doe"));
        assert!(validate_name("Mary-Jane O'Connor"));
        assert!(!validate_name(""));
        assert!(!validate_name("   "));
        assert!(!validate_name(&"a".repeat(51))); // Too long
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   \t\n"));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_comment_content_validator() {
        assert!(comment_content_validator("Nice post!").is_ok());
        assert!(comment_content_validator("  ").is_err());
        assert!(comment_content_validator(&"a".repeat(501)).is_err());
        assert!(comment_content_validator(&"a".repeat(500)).is_ok());
    }
}
