/// Credential presentation
///
/// All credentials travel in the `Authorization` header as `<Scheme> <value>`.
/// The scheme must match exactly (case-sensitive, single space). Anything else
/// is rejected before a token is looked at.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use sha2::{Digest, Sha256};

use crate::error::AuthError;

/// Scheme for session tokens
pub const BEARER_SCHEME: &str = "Bearer";
/// Scheme for refresh tokens
pub const REFRESH_SCHEME: &str = "Refresh";
/// Scheme for the payment provider's webhook key
pub const API_KEY_SCHEME: &str = "ApiKey";

/// Extract the credential for `scheme` from the `Authorization` header
///
/// # Errors
/// Returns [`AuthError::Unauthenticated`] if the header is missing, is not
/// visible ASCII, uses another scheme, or carries an empty value
pub fn credential<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, AuthError> {
    let raw = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::Unauthenticated)?;

    let value = raw
        .strip_prefix(scheme)
        .and_then(|rest| rest.strip_prefix(' '))
        .ok_or(AuthError::Unauthenticated)?;

    if value.is_empty() || value.contains(char::is_whitespace) {
        return Err(AuthError::Unauthenticated);
    }

    Ok(value)
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    credential(headers, BEARER_SCHEME)
}

pub fn refresh_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    credential(headers, REFRESH_SCHEME)
}

pub fn api_key(headers: &HeaderMap) -> Result<&str, AuthError> {
    credential(headers, API_KEY_SCHEME)
}

/// Compare a presented secret with the expected one in constant time
///
/// Both sides are reduced to SHA-256 digests first, so the comparison time
/// depends on neither the content nor the length of either input.
pub fn secrets_match(presented: &str, expected: &str) -> bool {
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());

    presented
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
