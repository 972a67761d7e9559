/// Persistence seams
///
/// The core never talks to a database directly. Handlers and the session
/// manager go through these traits; `postgres` backs them with sqlx, `memory`
/// keeps everything in a mutex-guarded map for tests and local runs.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::RefreshTokenRecord;
use crate::error::DatabaseError;
use crate::models::{Chirp, User};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. A taken email is [`DatabaseError::UniqueConstraintViolation`].
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, DatabaseError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Set the Chirpy Red flag. Returns `false` if no such user exists.
    async fn upgrade_to_chirpy_red(&self, user_id: Uuid) -> Result<bool, DatabaseError>;

    /// Remove every user (and, by cascade, their chirps and refresh tokens)
    async fn delete_all_users(&self) -> Result<u64, DatabaseError>;
}

#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, DatabaseError>;

    async fn get_chirp(&self, chirp_id: Uuid) -> Result<Option<Chirp>, DatabaseError>;

    /// All chirps, oldest first
    async fn list_chirps(&self) -> Result<Vec<Chirp>, DatabaseError>;
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Mint and persist a refresh token for `user_id`, returning its plaintext value
    async fn create(&self, user_id: Uuid) -> Result<String, DatabaseError>;

    async fn lookup(&self, token: &str) -> Result<Option<RefreshTokenRecord>, DatabaseError>;

    /// Mark the token revoked if it is not already. Returns rows affected.
    async fn revoke(&self, token: &str) -> Result<u64, DatabaseError>;
}

/// The set of stores a running server needs
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserStore>,
    pub chirps: Arc<dyn ChirpStore>,
    pub refresh_tokens: Arc<dyn RefreshTokenStore>,
}

impl Storage {
    pub fn postgres(pool: sqlx::PgPool, refresh_token_ttl: chrono::Duration) -> Self {
        Self::from_store(Arc::new(PgStore::new(pool, refresh_token_ttl)))
    }

    pub fn in_memory(refresh_token_ttl: chrono::Duration) -> Self {
        Self::from_store(Arc::new(InMemoryStore::new(refresh_token_ttl)))
    }

    fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserStore + ChirpStore + RefreshTokenStore + 'static,
    {
        Self {
            users: store.clone(),
            chirps: store.clone(),
            refresh_tokens: store,
        }
    }
}
