/// In-process store used by tests and local runs without Postgres
///
/// Mirrors the Postgres semantics that matter to callers: unique emails,
/// cascading user deletion, and refresh tokens keyed by digest.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::{generate_refresh_token, hash_token, RefreshTokenRecord};
use crate::error::DatabaseError;
use crate::models::{Chirp, User};
use crate::store::{ChirpStore, RefreshTokenStore, UserStore};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    chirps: Vec<Chirp>,
    refresh_tokens: HashMap<String, RefreshTokenRecord>,
}

pub struct InMemoryStore {
    tables: Mutex<Tables>,
    refresh_token_ttl: Duration,
}

impl InMemoryStore {
    pub fn new(refresh_token_ttl: Duration) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            refresh_token_ttl,
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, DatabaseError> {
        self.tables
            .lock()
            .map_err(|_| DatabaseError::UnexpectedError("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, DatabaseError> {
        let mut tables = self.tables()?;

        if tables.users.values().any(|u| u.email == email) {
            return Err(DatabaseError::UniqueConstraintViolation(format!(
                "email {} already registered",
                email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            created_at: now,
            updated_at: now,
            is_chirpy_red: false,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables()?;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn upgrade_to_chirpy_red(&self, user_id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables()?;
        match tables.users.get_mut(&user_id) {
            Some(user) => {
                user.is_chirpy_red = true;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all_users(&self) -> Result<u64, DatabaseError> {
        let mut tables = self.tables()?;
        let deleted = tables.users.len() as u64;

        tables.users.clear();
        tables.chirps.clear();
        tables.refresh_tokens.clear();

        Ok(deleted)
    }
}

#[async_trait]
impl ChirpStore for InMemoryStore {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, DatabaseError> {
        let mut tables = self.tables()?;

        if !tables.users.contains_key(&user_id) {
            return Err(DatabaseError::ForeignKeyViolation(format!("user {} does not exist", user_id)));
        }

        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        tables.chirps.push(chirp.clone());

        Ok(chirp)
    }

    async fn get_chirp(&self, chirp_id: Uuid) -> Result<Option<Chirp>, DatabaseError> {
        let tables = self.tables()?;
        Ok(tables.chirps.iter().find(|c| c.id == chirp_id).cloned())
    }

    async fn list_chirps(&self) -> Result<Vec<Chirp>, DatabaseError> {
        // Insertion order is creation order.
        Ok(self.tables()?.chirps.clone())
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryStore {
    async fn create(&self, user_id: Uuid) -> Result<String, DatabaseError> {
        let token = generate_refresh_token();
        let now = Utc::now();

        self.tables()?.refresh_tokens.insert(
            hash_token(&token),
            RefreshTokenRecord {
                user_id,
                created_at: now,
                expires_at: now + self.refresh_token_ttl,
                revoked_at: None,
            },
        );

        Ok(token)
    }

    async fn lookup(&self, token: &str) -> Result<Option<RefreshTokenRecord>, DatabaseError> {
        let tables = self.tables()?;
        Ok(tables.refresh_tokens.get(&hash_token(token)).cloned())
    }

    async fn revoke(&self, token: &str) -> Result<u64, DatabaseError> {
        let mut tables = self.tables()?;
        match tables.refresh_tokens.get_mut(&hash_token(token)) {
            Some(record) if record.revoked_at.is_none() => {
                record.revoked_at = Some(Utc::now());
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}
