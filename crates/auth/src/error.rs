use thiserror::Error;

use taskforge_core::DomainError;

use crate::password::PasswordError;
use crate::token::TokenError;

/// Error surfaced by the auth core to the routing boundary.
///
/// Every variant is terminal for the current request; nothing here is retried
/// internally. No variant ever carries a password or a password hash.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password. A single generic shape; callers
    /// cannot tell which factor failed (account enumeration).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired, or signature-invalid token.
    #[error("unauthorized")]
    Unauthorized,

    /// Valid token, but the permission snapshot does not satisfy the
    /// operation's requirement.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Uniqueness conflict (duplicate email or role name).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A referenced record (role, user) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed input (bad email, short password, empty role name).
    #[error("validation: {0}")]
    Validation(String),

    /// Storage backend failure.
    #[error("storage: {0}")]
    Storage(String),

    /// Internal failure (hashing, token encoding, serialization).
    #[error("internal: {0}")]
    Internal(String),
}

impl From<DomainError> for AuthError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(m) => AuthError::Validation(m),
            DomainError::InvalidId(m) => AuthError::Validation(m),
            DomainError::NotFound => AuthError::NotFound("record not found".to_string()),
            DomainError::Conflict(m) => AuthError::Conflict(m),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Unauthorized => AuthError::Unauthorized,
            TokenError::Encode(m) => AuthError::Internal(m),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(e: PasswordError) -> Self {
        AuthError::Internal(e.to_string())
    }
}
