//! Argon2id password hashing and verification.
//!
//! All password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`]. The PHC string format is used for storage so
//! that algorithm parameters and salt are embedded in the hash itself.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Failures from hashing or verifying a password.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Hashing failed, or the stored record is not a valid PHC string.
    #[error("password hashing failed: {0}")]
    Hashing(argon2::password_hash::Error),

    /// The password does not match the stored hash.
    #[error("password does not match")]
    Mismatch,
}

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(PasswordError::Hashing)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// The digest comparison is constant-time. Returns [`PasswordError::Mismatch`]
/// for a wrong password and [`PasswordError::Hashing`] if `hash` is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(PasswordError::Hashing)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(()),
        Err(argon2::password_hash::Error::Password) => Err(PasswordError::Mismatch),
        Err(e) => Err(PasswordError::Hashing(e)),
    }
}

/// Argon2id hash of a throwaway password, computed once per process.
///
/// `None` only if hashing itself failed.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    DUMMY_HASH
        .get_or_init(|| hash_password("chirpy-dummy-password").ok())
        .as_deref()
}

/// Run one Argon2 verification against [`dummy_hash`] and discard the result.
///
/// Called when there is no stored hash to check, so that path costs the
/// same as a wrong password.
pub fn verify_against_dummy(password: &str) {
    if let Some(hash) = dummy_hash() {
        let _ = verify_password(password, hash);
    }
}
