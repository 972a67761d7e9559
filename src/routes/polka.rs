/// Payment provider webhook

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::credentials::{api_key, secrets_match};
use crate::configuration::PolkaSettings;
use crate::error::{AppError, AuthError, ValidationError};
use crate::store::Storage;

/// The only event this service acts on
const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Deserialize)]
pub struct WebhookData {
    pub user_id: Uuid,
}

/// POST /api/polka/webhooks
///
/// Requires `Authorization: ApiKey <key>`. Every authenticated delivery is
/// acknowledged with 204, including unrecognised events and upgrades for
/// users that no longer exist.
///
/// # Errors
/// - 401: Missing or wrong API key
pub async fn polka_webhook(
    req: HttpRequest,
    payload: web::Bytes,
    polka: web::Data<PolkaSettings>,
    storage: web::Data<Storage>,
) -> Result<HttpResponse, AppError> {
    let presented = api_key(req.headers())?;
    if !secrets_match(presented, &polka.api_key) {
        return Err(AuthError::InvalidApiKey.into());
    }

    // Key first, payload second.
    let event: WebhookEvent = serde_json::from_slice(&payload)
        .map_err(|_| ValidationError::InvalidFormat("webhook payload"))?;

    if event.event != USER_UPGRADED {
        tracing::debug!(event = %event.event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = event.data.user_id;
    if storage.users.upgrade_to_chirpy_red(user_id).await? {
        tracing::info!(user_id = %user_id, "User upgraded to Chirpy Red");
    } else {
        tracing::warn!(user_id = %user_id, "Upgrade event for unknown user");
    }

    Ok(HttpResponse::NoContent().finish())
}
