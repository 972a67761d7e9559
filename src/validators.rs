/// Input validators for account creation
/// 1. DoS protection: input length limits
/// 2. Email format validation

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_EMAIL_LENGTH: usize = 3;
const MAX_PASSWORD_LENGTH: usize = 128;

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();
}

/// Validates an email address, returning it trimmed
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email"));
    }

    if trimmed.len() < MIN_EMAIL_LENGTH {
        return Err(ValidationError::TooShort("email", MIN_EMAIL_LENGTH));
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email", MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email"));
    }

    if has_suspicious_email_patterns(trimmed) {
        return Err(ValidationError::SuspiciousContent("email"));
    }

    Ok(trimmed.to_string())
}

/// Validates a password before it is hashed
///
/// Only shape is checked here; the upper bound keeps the hasher's work bounded.
pub fn is_valid_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password"));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong("password", MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

fn has_suspicious_email_patterns(email: &str) -> bool {
    // Overlong local part
    if let Some(at_pos) = email.find('@') {
        if at_pos > 64 {
            return true;
        }
    }

    if email.matches('@').count() != 1 {
        return true;
    }

    email.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("a@example.com").is_ok());
        assert!(is_valid_email("test.email@domain.co.uk").is_ok());
        assert!(is_valid_email("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_is_trimmed() {
        assert_eq!(is_valid_email("  a@example.com ").unwrap(), "a@example.com");
    }

    #[test]
    fn test_invalid_email_format() {
        assert!(is_valid_email("invalid").is_err());
        assert!(is_valid_email("user@").is_err());
        assert!(is_valid_email("@example.com").is_err());
        assert!(is_valid_email("user@@example.com").is_err());
    }

    #[test]
    fn test_email_length_limits() {
        let too_long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(is_valid_email(&too_long), Err(ValidationError::TooLong("email", MAX_EMAIL_LENGTH)));
        assert_eq!(is_valid_email(""), Err(ValidationError::EmptyField("email")));
    }

    #[test]
    fn test_overlong_local_part() {
        let email = format!("{}@example.com", "a".repeat(65));
        assert_eq!(is_valid_email(&email), Err(ValidationError::SuspiciousContent("email")));
    }

    #[test]
    fn test_password_shape() {
        assert!(is_valid_password("secret1").is_ok());
        assert_eq!(is_valid_password(""), Err(ValidationError::EmptyField("password")));
        assert!(is_valid_password(&"a".repeat(MAX_PASSWORD_LENGTH + 1)).is_err());
    }
}
