//! Argon2id password hashing.
//!
//! Both operations are CPU-bound and run on the blocking pool.

use argon2::{
    password_hash::{self, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use rand_core::OsRng;

use crate::error::{AppError, AppResult};

/// Hashes `plain` into a PHC string with a fresh random salt.
pub async fn hash(plain: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hashed = Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|err| AppError::PasswordHash(err.to_string()))?;
        Ok(hashed.to_string())
    })
    .await
    .map_err(|err| AppError::PasswordHash(err.to_string()))?
}

/// Checks `plain` against a stored PHC string.
///
/// A mismatch is `Ok(false)`; an unreadable stored hash is an error.
pub async fn verify(plain: String, hashed: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || -> AppResult<bool> {
        let parsed =
            PasswordHash::new(&hashed).map_err(|err| AppError::PasswordHash(err.to_string()))?;
        match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(AppError::PasswordHash(err.to_string())),
        }
    })
    .await
    .map_err(|err| AppError::PasswordHash(err.to_string()))?
}
