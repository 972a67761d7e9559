/// Refresh Token Values and Lifecycle
///
/// Refresh tokens are:
/// - 32 bytes from the OS-seeded thread RNG, hex-encoded (64 characters)
/// - Hashed with SHA-256 before storage (stores never keep plaintext)
/// - Reusable until they expire or are revoked; revocation is permanent

use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new refresh token value
///
/// The returned plaintext goes to the client exactly once.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Digest used as the storage key for a refresh token
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// What a store knows about a refresh token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenState {
    Active,
    Expired,
    Revoked,
}

impl RefreshTokenRecord {
    /// Lifecycle state at `now`. Revocation wins over expiry.
    pub fn state_at(&self, now: DateTime<Utc>) -> RefreshTokenState {
        if self.revoked_at.is_some() {
            RefreshTokenState::Revoked
        } else if now >= self.expires_at {
            RefreshTokenState::Expired
        } else {
            RefreshTokenState::Active
        }
    }
}
