//! Password hashing seam.
//!
//! Hashing is one-way and irreversible by contract. The default adapter uses
//! Argon2id in PHC string format; the trait exists so tests and alternative
//! deployments can substitute their own.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential hash failure: {0}")]
    Hash(String),
}

/// One-way password transform consumed by the account service.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, CredentialError>;
    /// `Ok(false)` on mismatch; `Err` only when the stored hash is malformed.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError>;
}

/// Argon2id adapter with the crate's default parameters.
#[derive(Debug, Default, Clone)]
pub struct Argon2CredentialHasher;

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| CredentialError::Hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|err| CredentialError::Hash(format!("invalid hash format: {err}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(CredentialError::Hash(format!("verify error: {err}"))),
        }
    }
}
