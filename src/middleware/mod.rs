/// Middleware module
///
/// Request-level concerns that sit in front of handlers: session
/// authentication and the static file hit counter.

mod authenticated_user;
mod hit_counter;

pub use authenticated_user::AuthenticatedUser;
pub use hit_counter::HitCounter;
