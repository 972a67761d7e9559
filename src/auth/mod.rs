/// Authentication module
///
/// Password hashing, session token signing/validation, refresh token
/// lifecycle, credential header parsing, and the session manager tying
/// them together.

mod claims;
pub mod credentials;
mod jwt;
mod password;
mod refresh_token;
mod session;

pub use claims::{Claims, ISSUER};
pub use jwt::{issue_token, validate_token, TokenError};
pub use password::{hash_password, verify_password, HashingError};
pub use refresh_token::{
    generate_refresh_token, hash_token, RefreshTokenRecord, RefreshTokenState,
};
pub use session::{LoginOutcome, SessionManager};
