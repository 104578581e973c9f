use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use std::fmt;
use std::sync::OnceLock;

use crate::errors::AuthError;

/// Password hashing with Argon2id
///
/// Every hash gets a fresh random salt. The pepper is passed as Argon2's secret
/// parameter and is never stored alongside the hash.
pub struct PasswordCrypto {
    password_pepper: String,
    dummy_hash: OnceLock<String>,
}

impl PasswordCrypto {
    pub fn new(password_pepper: String) -> Self {
        Self {
            password_pepper,
            dummy_hash: OnceLock::new(),
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, AuthError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| AuthError::internal("init_argon2", e.to_string()))
    }

    /// Hash a plaintext password into a PHC string
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);

        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::internal("hash_password", e.to_string()))?
            .to_string();

        Ok(hash)
    }

    /// Check a plaintext password against a stored hash
    ///
    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
    pub fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| AuthError::internal("parse_password_hash", e.to_string()))?;

        match self.argon2()?.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::internal("verify_password", e.to_string())),
        }
    }

    /// Run a full verification against a throwaway hash and discard the outcome
    ///
    /// Used when there is no account to check, so the caller spends the same
    /// hashing time as for a real mismatch.
    pub fn verify_against_dummy(&self, password: &str) -> Result<(), AuthError> {
        let dummy_hash = self.dummy_hash()?;
        self.verify_password(password, dummy_hash)?;
        Ok(())
    }

    fn dummy_hash(&self) -> Result<&str, AuthError> {
        if let Some(hash) = self.dummy_hash.get() {
            return Ok(hash);
        }

        let hash = self.hash_password("authledger-dummy-password")?;
        Ok(self.dummy_hash.get_or_init(|| hash))
    }

    #[cfg(test)]
    pub(crate) fn has_dummy_hash(&self) -> bool {
        self.dummy_hash.get().is_some()
    }
}

impl fmt::Debug for PasswordCrypto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCrypto")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
