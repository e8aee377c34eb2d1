//! Password hashing and verification
//!
//! Local credentials are stored as Argon2id PHC strings. Hashing generates
//! a fresh random salt; verification parses the stored string and compares
//! in constant time inside the argon2 crate. Plaintext passwords are never
//! stored or logged.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AppError;

/// Hash a password with a freshly generated salt
///
/// # Returns
/// A PHC-format string (e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`)
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string
///
/// Returns `Ok(false)` on mismatch. Errors only if the stored hash is
/// malformed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored password hash invalid: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
