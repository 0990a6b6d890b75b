//! Argon2id password hashing.
//!
//! Hashes are stored in PHC string format, so the algorithm, parameters and
//! salt travel with the hash and verification needs nothing else.

use super::error::{AppError, Result};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use rand::RngCore;

const SALT_LEN: usize = 16;

/// Hashes `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let salt_string =
        SaltString::encode_b64(&salt).map_err(|e| AppError::PasswordHash(format!("Salt encoding failed: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt_string)
        .map_err(|e| AppError::PasswordHash(format!("Hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Checks `password` against a stored PHC hash.
///
/// A mismatch is `Ok(false)`. A stored value that is not a valid hash is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| AppError::PasswordHash(format!("Stored hash is malformed: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::PasswordHash(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn unicode_password() {
        let hash = hash_password("পাসওয়ার্ড🔑").unwrap();
        assert!(verify_password("পাসওয়ার্ড🔑", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(verify_password("x", "not-a-hash"), Err(AppError::PasswordHash(_))));
    }
}
