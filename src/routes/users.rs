/// Account Routes

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::hash_password;
use crate::error::{AppError, ErrorContext};
use crate::models::UserProfile;
use crate::store::Storage;
use crate::validators::{is_valid_email, is_valid_password};

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/users
///
/// Create an account. The response is the public profile only.
///
/// # Errors
/// - 400: Invalid email or empty password
/// - 409: Email already registered
/// - 500: Hashing or store failure
pub async fn create_user(
    form: web::Json<CreateUserRequest>,
    storage: web::Data<Storage>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_creation");

    let email = is_valid_email(&form.email)?;
    is_valid_password(&form.password)?;
    let hashed_password = hash_password(&form.password)?;

    let user = storage
        .users
        .create_user(&email, &hashed_password)
        .await
        .map_err(|e| {
            let err = AppError::from(e);
            context.log_error(&err);
            err
        })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User created"
    );

    Ok(HttpResponse::Created().json(UserProfile::from(&user)))
}
