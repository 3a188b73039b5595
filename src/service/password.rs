use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::DashError;

/// Hash a password with argon2 and a fresh random salt. The result is a PHC
/// string carrying algorithm, parameters and salt.
pub fn hash_password(password: &str) -> Result<String, DashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DashError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a candidate password against a stored PHC hash string.
/// A mismatch is `InvalidCredentials`; a malformed stored hash is an
/// internal error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), DashError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| DashError::PasswordHash(format!("stored hash is malformed: {e}")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| DashError::InvalidCredentials)
}
