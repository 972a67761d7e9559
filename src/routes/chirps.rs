/// Chirp Routes

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content_filter::validate_chirp;
use crate::error::{AppError, AuthError, DatabaseError, ErrorContext, ValidationError};
use crate::middleware::AuthenticatedUser;
use crate::store::Storage;

#[derive(Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

#[derive(Serialize)]
pub struct CleanedChirpResponse {
    pub cleaned_body: String,
}

/// POST /api/validate_chirp
///
/// Dry run of the content filter; nothing is stored.
pub async fn validate_chirp_body(form: web::Json<ChirpRequest>) -> Result<HttpResponse, AppError> {
    let cleaned_body = validate_chirp(&form.body)?;
    Ok(HttpResponse::Ok().json(CleanedChirpResponse { cleaned_body }))
}

/// POST /api/chirps
///
/// # Authentication
/// Requires `Authorization: Bearer <session_token>`
///
/// # Errors
/// - 401: Missing or invalid session token, or its user no longer exists
/// - 400: Body longer than 140 characters
pub async fn create_chirp(
    user: AuthenticatedUser,
    form: web::Json<ChirpRequest>,
    storage: web::Data<Storage>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("chirp_creation").with_user_id(user.user_id.to_string());

    let body = validate_chirp(&form.body)?;
    let chirp = storage
        .chirps
        .create_chirp(user.user_id, &body)
        .await
        .map_err(|e| {
            let err = match e {
                DatabaseError::ForeignKeyViolation(_) => AppError::Auth(AuthError::TokenInvalid),
                e => AppError::from(e),
            };
            context.log_error(&err);
            err
        })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.user_id,
        chirp_id = %chirp.id,
        "Chirp created"
    );

    Ok(HttpResponse::Created().json(chirp))
}

/// GET /api/chirps
pub async fn get_chirps(storage: web::Data<Storage>) -> Result<HttpResponse, AppError> {
    let chirps = storage.chirps.list_chirps().await?;
    Ok(HttpResponse::Ok().json(chirps))
}

/// GET /api/chirps/{chirp_id}
///
/// # Errors
/// - 400: Path segment is not a UUID
/// - 404: No such chirp
pub async fn get_chirp(
    path: web::Path<String>,
    storage: web::Data<Storage>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = Uuid::parse_str(&path.into_inner())
        .map_err(|_| ValidationError::InvalidFormat("chirp_id"))?;

    let chirp = storage
        .chirps
        .get_chirp(chirp_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("chirp {}", chirp_id)))?;

    Ok(HttpResponse::Ok().json(chirp))
}
