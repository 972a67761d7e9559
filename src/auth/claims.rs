/// JWT Claims structure
///
/// Registered claims (RFC 7519) carried by a session token. No custom claims:
/// the subject is the only identity the token vouches for.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwt::TokenError;

/// Issuer stamped into and required from every session token
pub const ISSUER: &str = "chirpy";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub iss: String,
}

impl Claims {
    /// Create claims for `user_id` valid for `ttl` from now
    pub fn new(user_id: Uuid, ttl: chrono::Duration) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            exp: now + ttl.num_seconds(),
            iat: now,
            iss: ISSUER.to_string(),
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns [`TokenError::MalformedSubject`] if the subject is not a UUID
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::MalformedSubject)
    }
}
