//! Salted password hashing.
//!
//! Passwords are never stored. `users` keeps an Argon2id PHC string per user
//! and login verifies against it.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An Argon2id password hash in PHC string format.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash a password with a freshly generated salt.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` for an empty password and
    /// `Error::Other` if the hasher itself fails.
    pub fn hash(password: &str) -> Result<Self> {
        if password.is_empty() {
            return Err(Error::ValidationError("password is required".to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|e| Error::Other(format!("password hashing failed: {}", e)))
    }

    /// Check a candidate password. A malformed stored hash never verifies.
    pub fn verify(&self, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.0) else {
            warn!("Stored password hash is malformed; rejecting login");
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// The PHC string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}
