mod admin;
mod auth;
mod chirps;
mod health_check;
mod polka;
mod users;

pub use admin::{metrics, reset};
pub use auth::{login, refresh, revoke};
pub use chirps::{create_chirp, get_chirp, get_chirps, validate_chirp_body};
pub use health_check::health_check;
pub use polka::polka_webhook;
pub use users::create_user;
