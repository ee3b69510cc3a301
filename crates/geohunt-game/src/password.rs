//! Password hashing and verification using Argon2.
//!
//! Uses the argon2id variant with the crate's recommended parameters.
//! Hashes are stored in PHC string format, which embeds the salt and
//! parameters alongside the digest.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::GameError;

/// Hash a password with a fresh random salt.
///
/// # Errors
///
/// Returns [`GameError::Internal`] if hashing fails (this indicates a
/// broken environment, not bad input).
pub fn hash_password(password: &str) -> Result<String, GameError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| GameError::Internal(format!("failed to hash password: {e}")))
}

/// Verify a password against a stored PHC-format hash.
///
/// A malformed stored hash is an internal error, not a failed login --
/// it means the record was corrupted, and reporting it as "wrong
/// password" would hide that.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, GameError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| GameError::Internal(format!("invalid stored password hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_different_salts() {
        let password = "same-password";
        let hash_a = hash_password(password).unwrap();
        let hash_b = hash_password(password).unwrap();

        assert_ne!(hash_a, hash_b);
        assert!(verify_password(password, &hash_a).unwrap());
        assert!(verify_password(password, &hash_b).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(verify_password("password", "not-a-valid-hash").is_err());
    }
}
