/// Session authentication extractor
///
/// Handlers that need a logged-in caller take an [`AuthenticatedUser`]
/// argument. Extraction reads `Authorization: Bearer <token>`, validates it
/// through the [`SessionManager`], and rejects the request with 401 before the
/// handler body runs.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::credentials::bearer_token;
use crate::auth::SessionManager;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let token = bearer_token(req.headers())?;

    let sessions = req
        .app_data::<web::Data<SessionManager>>()
        .ok_or_else(|| AppError::Internal("SessionManager not registered".to_string()))?;

    let user_id = sessions.authenticate(token)?;
    tracing::debug!(user_id = %user_id, "Session token validated");

    Ok(AuthenticatedUser { user_id })
}
