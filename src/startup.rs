use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;

use crate::auth::SessionManager;
use crate::configuration::Settings;
use crate::metrics::Metrics;
use crate::middleware::HitCounter;
use crate::routes::{
    create_chirp, create_user, get_chirp, get_chirps, health_check, login, metrics, polka_webhook,
    refresh, reset, revoke, validate_chirp_body,
};
use crate::store::Storage;

pub fn run(
    listener: TcpListener,
    storage: Storage,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let sessions = web::Data::new(SessionManager::new(
        storage.users.clone(),
        storage.refresh_tokens.clone(),
        settings.jwt.secret.clone(),
        settings.jwt.access_token_ttl(),
    ));
    let storage = web::Data::new(storage);
    let metrics_data = web::Data::new(Metrics::new());
    let polka = web::Data::new(settings.polka.clone());
    let platform = web::Data::new(settings.application.platform);
    let static_dir = settings.application.static_dir.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())

            // Shared state
            .app_data(sessions.clone())
            .app_data(storage.clone())
            .app_data(metrics_data.clone())
            .app_data(polka.clone())
            .app_data(platform.clone())

            .route("/api/healthz", web::get().to(health_check))
            .route("/api/validate_chirp", web::post().to(validate_chirp_body))

            // Accounts and sessions
            .route("/api/users", web::post().to(create_user))
            .route("/api/login", web::post().to(login))
            .route("/api/refresh", web::post().to(refresh))
            .route("/api/revoke", web::post().to(revoke))

            // Chirps (POST requires a session token, see AuthenticatedUser)
            .route("/api/chirps", web::post().to(create_chirp))
            .route("/api/chirps", web::get().to(get_chirps))
            .route("/api/chirps/{chirp_id}", web::get().to(get_chirp))

            .route("/api/polka/webhooks", web::post().to(polka_webhook))

            .route("/admin/metrics", web::get().to(metrics))
            .route("/admin/reset", web::post().to(reset))

            // Static app, every request counted
            .service(
                web::scope("/app")
                    .wrap(HitCounter::new(metrics_data.clone()))
                    .service(fs::Files::new("", &static_dir).index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
