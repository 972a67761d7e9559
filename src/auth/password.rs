/// Password Hashing and Verification
///
/// Passwords are hashed with Argon2id and a fresh random salt per call. The
/// stored record is a PHC string, so algorithm, parameters and salt travel
/// with the hash and verification needs no extra configuration.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use lazy_static::lazy_static;
use std::fmt;

lazy_static! {
    /// Record checked when no real one exists, so a missing account costs
    /// the same Argon2 work as a wrong password
    static ref DUMMY_HASH: String = hash_password("chirpy-dummy-password")
        .expect("hashing a constant password cannot fail");
}

/// Failure inside the hashing machinery (RNG, parameters, malformed record).
/// A password mismatch is not an error.
#[derive(Debug)]
pub struct HashingError(String);

impl fmt::Display for HashingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password hashing failed: {}", self.0)
    }
}

impl std::error::Error for HashingError {}

impl From<argon2::password_hash::Error> for HashingError {
    fn from(err: argon2::password_hash::Error) -> Self {
        HashingError(err.to_string())
    }
}

/// Hash a password using Argon2id
///
/// # Errors
/// Returns error if salt generation or hashing fails
pub fn hash_password(password: &str) -> Result<String, HashingError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against its stored PHC record
///
/// Returns `Ok(false)` on mismatch.
///
/// # Errors
/// Returns error if the stored record cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, HashingError> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Run a full verification against a throwaway record and discard the result
pub fn verify_dummy_password(password: &str) {
    let _ = verify_password(password, &DUMMY_HASH);
}

/// Build the throwaway record ahead of the first login
pub fn warm_up_dummy_hash() {
    lazy_static::initialize(&DUMMY_HASH);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "secret1";
        let hash = hash_password(password).expect("Failed to hash password");

        assert_ne!(password, hash);
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains(password));
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("secret1").expect("Failed to hash password");

        let is_valid = verify_password("secret1", &hash).expect("Failed to verify password");
        assert!(is_valid);
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("secret1").expect("Failed to hash password");

        let is_valid = verify_password("secret2", &hash).expect("Failed to verify password");
        assert!(!is_valid);
    }

    #[test]
    fn test_same_password_gets_fresh_salt() {
        let first = hash_password("secret1").unwrap();
        let second = hash_password("secret1").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("secret1", &first).unwrap());
        assert!(verify_password("secret1", &second).unwrap());
    }

    #[test]
    fn test_dummy_record_is_a_real_hash() {
        assert!(DUMMY_HASH.starts_with("$argon2id$"));
        assert!(!verify_password("secret1", &DUMMY_HASH).unwrap());
        verify_dummy_password("secret1");
    }

    #[test]
    fn test_malformed_record_is_an_error() {
        assert!(verify_password("secret1", "not-a-phc-string").is_err());
    }
}
