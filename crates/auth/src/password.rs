//! Password hashing and verification (Argon2id).

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::{Argon2, Params};
use thiserror::Error;

/// Structural marker of this component's own output (PHC string format).
///
/// Every hash produced here starts with this prefix; nothing a user could
/// choose as a password legitimately does.
pub const PHC_PREFIX: &str = "$argon2";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Salted, cost-tunable one-way password hasher.
///
/// The same hashing path runs on both user creation and user update, and the
/// update path may legitimately receive a value that is already a hash (a
/// record round-tripped through the store with only non-password fields
/// changed). [`PasswordHasher::hash`] therefore refuses to re-hash its own
/// output: an input carrying [`PHC_PREFIX`] is returned unchanged. Without
/// that guard a routine update would silently corrupt the stored credential.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Hasher with the library's default cost parameters.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hasher with explicit cost parameters.
    ///
    /// Production keeps the defaults; tests drop the memory/time cost so
    /// suites stay fast.
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        }
    }

    /// Hash a plaintext password into a PHC-format string.
    ///
    /// Already-hashed input passes through unchanged (see type docs).
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        if Self::is_hashed(plaintext) {
            return Ok(plaintext.to_string());
        }

        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// Never errors on mismatch; any parse or verification failure is simply
    /// `false`.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        match PasswordHash::new(hashed) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Whether `value` structurally looks like this component's own output.
    pub fn is_hashed(value: &str) -> bool {
        value.starts_with(PHC_PREFIX)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
