//! Password hashing
//!
//! Passwords are stored as Argon2id PHC strings
//! (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`), which carry their own
//! salt and parameters. Plaintext passwords are never stored.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use tracing::warn;

use crate::{Error, Result};

/// Hash a password with a freshly generated salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Check a password against a stored PHC string
///
/// A stored value that does not parse never verifies.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = match PasswordHash::new(password_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
