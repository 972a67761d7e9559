/// JWT Token Generation and Validation
///
/// Session tokens are HS256-signed and self-contained. Nothing about them is
/// persisted; validity is signature plus expiry, checked against the clock on
/// every call.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use uuid::Uuid;

use crate::auth::claims::{Claims, ISSUER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature does not verify under the given secret
    InvalidSignature,
    /// Current time is past `exp`
    Expired,
    /// `sub` is not a parsable user ID
    MalformedSubject,
    /// Not a decodable token, or issued by someone else
    Malformed,
    /// Encoding failed while issuing
    Signing(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::InvalidSignature => write!(f, "Token signature is invalid"),
            TokenError::Expired => write!(f, "Token has expired"),
            TokenError::MalformedSubject => write!(f, "Token subject is not a valid user ID"),
            TokenError::Malformed => write!(f, "Token is malformed"),
            TokenError::Signing(msg) => write!(f, "Token generation failed: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Issue a session token for `user_id`, valid for `ttl`
///
/// # Errors
/// Returns [`TokenError::Signing`] if encoding fails
pub fn issue_token(user_id: Uuid, secret: &str, ttl: chrono::Duration) -> Result<String, TokenError> {
    let claims = Claims::new(user_id, ttl);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Validate a session token and return the user it was issued to
///
/// # Errors
/// - [`TokenError::InvalidSignature`] if signed with a different secret or tampered with
/// - [`TokenError::Expired`] if the current time is past `exp`
/// - [`TokenError::MalformedSubject`] if `sub` is not a UUID
/// - [`TokenError::Malformed`] for anything that does not decode as one of our tokens
pub fn validate_token(token: &str, secret: &str) -> Result<Uuid, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.leeway = 0;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|e| {
            tracing::debug!("JWT validation error: {}", e);
            TokenError::from(e)
        })?;

    data.claims.user_id()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    fn hour() -> chrono::Duration {
        chrono::Duration::seconds(3600)
    }

    #[test]
    fn test_issue_and_validate_token() {
        let user_id = Uuid::new_v4();

        let token = issue_token(user_id, SECRET, hour()).expect("Failed to issue token");
        let validated = validate_token(&token, SECRET).expect("Failed to validate token");

        assert_eq!(validated, user_id);
    }

    #[test]
    fn test_expired_token() {
        let token = issue_token(Uuid::new_v4(), SECRET, chrono::Duration::seconds(-10))
            .expect("Failed to issue token");

        assert_eq!(validate_token(&token, SECRET), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret() {
        let token = issue_token(Uuid::new_v4(), SECRET, hour()).expect("Failed to issue token");

        assert_eq!(
            validate_token(&token, "some-other-secret"),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_wrong_secret_beats_expiry() {
        let token = issue_token(Uuid::new_v4(), SECRET, chrono::Duration::seconds(-10))
            .expect("Failed to issue token");

        assert_eq!(
            validate_token(&token, "some-other-secret"),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_garbage_token() {
        assert_eq!(validate_token("invalid.token.here", SECRET), Err(TokenError::Malformed));
        assert_eq!(validate_token("", SECRET), Err(TokenError::Malformed));
    }

    #[test]
    fn test_tampered_token() {
        let token = issue_token(Uuid::new_v4(), SECRET, hour()).expect("Failed to issue token");

        let tampered = format!("{}X", token);
        assert!(validate_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_malformed_subject() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            exp: now + 3600,
            iat: now,
            iss: ISSUER.to_string(),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes()))
            .unwrap();

        assert_eq!(validate_token(&token, SECRET), Err(TokenError::MalformedSubject));
    }

    #[test]
    fn test_foreign_issuer() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            exp: now + 3600,
            iat: now,
            iss: "someone-else".to_string(),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes()))
            .unwrap();

        assert_eq!(validate_token(&token, SECRET), Err(TokenError::Malformed));
    }
}
