/// Admin Routes

use actix_web::{web, HttpResponse};

use crate::configuration::Platform;
use crate::error::{AppError, AuthError};
use crate::metrics::Metrics;
use crate::store::Storage;

/// GET /admin/metrics
pub async fn metrics(metrics: web::Data<Metrics>) -> HttpResponse {
    let body = format!(
        r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>"#,
        metrics.file_server_hits()
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// POST /admin/reset
///
/// Zeroes the hit counter and deletes every user. Only available when the
/// platform is `dev`.
///
/// # Errors
/// - 403: Any other platform
pub async fn reset(
    platform: web::Data<Platform>,
    metrics: web::Data<Metrics>,
    storage: web::Data<Storage>,
) -> Result<HttpResponse, AppError> {
    let platform = **platform;
    if platform != Platform::Dev {
        tracing::warn!(platform = ?platform, "Reset refused outside dev");
        return Err(AuthError::Forbidden.into());
    }

    metrics.reset();
    let deleted = storage.users.delete_all_users().await?;

    tracing::warn!(deleted_users = deleted, "Application state reset");

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Hits reset to 0 and all users deleted"))
}
