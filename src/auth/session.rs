/// Session Manager
///
/// Orchestrates the credential lifecycle:
/// - login: password check, then a session token plus a fresh refresh token
/// - refresh: an active refresh token buys a new session token (no rotation)
/// - revoke: permanent, idempotent invalidation of a refresh token
/// - authenticate: session token to user ID
///
/// Failures that depend on secret material all collapse into one
/// `Unauthorized` outcome so callers cannot probe which check failed.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::jwt::{issue_token, validate_token};
use crate::auth::password::{verify_dummy_password, verify_password, warm_up_dummy_hash};
use crate::auth::refresh_token::RefreshTokenState;
use crate::error::{AppError, AuthError};
use crate::models::UserProfile;
use crate::store::{RefreshTokenStore, UserStore};

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub profile: UserProfile,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct SessionManager {
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    secret: String,
    session_ttl: Duration,
}

impl SessionManager {
    pub fn new(
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        secret: impl Into<String>,
        session_ttl: Duration,
    ) -> Self {
        warm_up_dummy_hash();
        Self {
            users,
            refresh_tokens,
            secret: secret.into(),
            session_ttl,
        }
    }

    /// # Errors
    /// - `Auth(InvalidCredentials)` for an unknown email, wrong password, or unverifiable hash
    /// - `Database(_)` / `Internal(_)` if the store or signer fails
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let user = match self.users.get_user_by_email(email).await? {
            Some(user) => user,
            None => {
                verify_dummy_password(password);
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        match verify_password(password, &user.hashed_password) {
            Ok(true) => {}
            Ok(false) => return Err(AuthError::InvalidCredentials.into()),
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Stored password record unusable");
                return Err(AuthError::InvalidCredentials.into());
            }
        }

        let token = issue_token(user.id, &self.secret, self.session_ttl)?;
        let refresh_token = self.refresh_tokens.create(user.id).await?;

        tracing::info!(user_id = %user.id, "Session opened");

        Ok(LoginOutcome {
            profile: UserProfile::from(&user),
            token,
            refresh_token,
        })
    }

    /// Issue a new session token from a refresh token
    ///
    /// The refresh token itself stays valid and may be presented again.
    ///
    /// # Errors
    /// `Auth(RefreshTokenRejected)` if the token is unknown, revoked or expired
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let record = self
            .refresh_tokens
            .lookup(refresh_token)
            .await?
            .ok_or(AuthError::RefreshTokenRejected)?;

        match record.state_at(Utc::now()) {
            RefreshTokenState::Active => {}
            RefreshTokenState::Revoked => {
                tracing::warn!(user_id = %record.user_id, "Attempt to use revoked refresh token");
                return Err(AuthError::RefreshTokenRejected.into());
            }
            RefreshTokenState::Expired => {
                tracing::info!(user_id = %record.user_id, "Refresh token expired");
                return Err(AuthError::RefreshTokenRejected.into());
            }
        }

        let token = issue_token(record.user_id, &self.secret, self.session_ttl)?;
        tracing::debug!(user_id = %record.user_id, "Session token refreshed");
        Ok(token)
    }

    /// Revoke a refresh token. Unknown and already-revoked tokens are fine.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AppError> {
        let affected = self.refresh_tokens.revoke(refresh_token).await?;
        tracing::debug!(affected, "Refresh token revocation processed");
        Ok(())
    }

    /// # Errors
    /// `Auth(TokenInvalid)` for any session token that does not validate
    pub fn authenticate(&self, session_token: &str) -> Result<Uuid, AppError> {
        validate_token(session_token, &self.secret).map_err(|e| {
            tracing::debug!(error = %e, "Session token rejected");
            AppError::Auth(AuthError::TokenInvalid)
        })
    }
}
