/// Postgres-backed stores
///
/// Schema lives in `migrations/`. Refresh tokens are keyed by their SHA-256
/// digest; the plaintext never reaches the database.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{generate_refresh_token, hash_token, RefreshTokenRecord};
use crate::error::DatabaseError;
use crate::models::{Chirp, User};
use crate::store::{ChirpStore, RefreshTokenStore, UserStore};

type UserRow = (Uuid, String, String, DateTime<Utc>, DateTime<Utc>, bool);
type ChirpRow = (Uuid, DateTime<Utc>, DateTime<Utc>, String, Uuid);

fn user_from_row(row: UserRow) -> User {
    let (id, email, hashed_password, created_at, updated_at, is_chirpy_red) = row;
    User {
        id,
        email,
        hashed_password,
        created_at,
        updated_at,
        is_chirpy_red,
    }
}

fn chirp_from_row(row: ChirpRow) -> Chirp {
    let (id, created_at, updated_at, body, user_id) = row;
    Chirp {
        id,
        created_at,
        updated_at,
        body,
        user_id,
    }
}

pub struct PgStore {
    pool: PgPool,
    refresh_token_ttl: Duration,
}

impl PgStore {
    pub fn new(pool: PgPool, refresh_token_ttl: Duration) -> Self {
        Self {
            pool,
            refresh_token_ttl,
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, DatabaseError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, hashed_password, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, email, hashed_password, created_at, updated_at, is_chirpy_red
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(row))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, hashed_password, created_at, updated_at, is_chirpy_red
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(user_from_row))
    }

    async fn upgrade_to_chirpy_red(&self, user_id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_chirpy_red = true, updated_at = $1
            WHERE id = $2
            "#,
        )
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_users(&self) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ChirpStore for PgStore {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, DatabaseError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, ChirpRow>(
            r#"
            INSERT INTO chirps (id, created_at, updated_at, body, user_id)
            VALUES ($1, $2, $2, $3, $4)
            RETURNING id, created_at, updated_at, body, user_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(now)
        .bind(body)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(chirp_from_row(row))
    }

    async fn get_chirp(&self, chirp_id: Uuid) -> Result<Option<Chirp>, DatabaseError> {
        let row = sqlx::query_as::<_, ChirpRow>(
            "SELECT id, created_at, updated_at, body, user_id FROM chirps WHERE id = $1",
        )
        .bind(chirp_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(chirp_from_row))
    }

    async fn list_chirps(&self) -> Result<Vec<Chirp>, DatabaseError> {
        let rows = sqlx::query_as::<_, ChirpRow>(
            "SELECT id, created_at, updated_at, body, user_id FROM chirps ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(chirp_from_row).collect())
    }
}

#[async_trait]
impl RefreshTokenStore for PgStore {
    async fn create(&self, user_id: Uuid) -> Result<String, DatabaseError> {
        let token = generate_refresh_token();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token_hash, user_id, created_at, updated_at, expires_at)
            VALUES ($1, $2, $3, $3, $4)
            "#,
        )
        .bind(hash_token(&token))
        .bind(user_id)
        .bind(now)
        .bind(now + self.refresh_token_ttl)
        .execute(&self.pool)
        .await?;

        Ok(token)
    }

    async fn lookup(&self, token: &str) -> Result<Option<RefreshTokenRecord>, DatabaseError> {
        let row = sqlx::query_as::<_, (Uuid, DateTime<Utc>, DateTime<Utc>, Option<DateTime<Utc>>)>(
            r#"
            SELECT user_id, created_at, expires_at, revoked_at
            FROM refresh_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(hash_token(token))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(user_id, created_at, expires_at, revoked_at)| RefreshTokenRecord {
            user_id,
            created_at,
            expires_at,
            revoked_at,
        }))
    }

    async fn revoke(&self, token: &str) -> Result<u64, DatabaseError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = $1, updated_at = $1
            WHERE token_hash = $2 AND revoked_at IS NULL
            "#,
        )
        .bind(now)
        .bind(hash_token(token))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
