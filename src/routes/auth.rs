/// Session Routes
///
/// Login, session refresh, and refresh token revocation.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::credentials::refresh_token;
use crate::auth::SessionManager;
use crate::error::{AppError, ErrorContext};
use crate::models::UserProfile;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile plus both credentials
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// POST /api/login
///
/// # Errors
/// - 401: Unknown email or wrong password (indistinguishable)
/// - 500: Internal server error
pub async fn login(
    form: web::Json<LoginRequest>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let outcome = sessions
        .login(form.email.trim(), &form.password)
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %outcome.profile.id,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        profile: outcome.profile,
        token: outcome.token,
        refresh_token: outcome.refresh_token,
    }))
}

/// POST /api/refresh
///
/// Requires `Authorization: Refresh <refresh_token>`. The refresh token is
/// not rotated.
///
/// # Errors
/// - 401: Missing, unknown, expired or revoked refresh token
pub async fn refresh(
    req: HttpRequest,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let token = refresh_token(req.headers())?;
    let session_token = sessions.refresh(token).await?;

    Ok(HttpResponse::Ok().json(RefreshResponse {
        token: session_token,
    }))
}

/// POST /api/revoke
///
/// Requires `Authorization: Refresh <refresh_token>`. Revoking an unknown or
/// already revoked token still answers 204.
///
/// # Errors
/// - 401: Missing or malformed header
/// - 500: Store failure
pub async fn revoke(
    req: HttpRequest,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_revocation");

    let token = refresh_token(req.headers())?;
    sessions.revoke(token).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    Ok(HttpResponse::NoContent().finish())
}
