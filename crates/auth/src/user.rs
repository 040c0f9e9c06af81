use chrono::{DateTime, Utc};
use serde::Serialize;

use taskforge_core::{DomainError, DomainResult, RoleId, UserId};

use crate::role::Role;

/// Canonicalize an email for use as a login key: trimmed, lowercased, and
/// structurally sane. Lookups and uniqueness checks always go through this.
pub fn canonicalize_email(raw: &str) -> DomainResult<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(email)
}

/// A user identity record.
///
/// Does **not** implement `Serialize`: the password hash must never reach a
/// client-facing structure on any code path. External responses go through
/// [`UserView`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Canonical email, used as the login key. Unique.
    pub email: String,
    /// Always a hash, never the plaintext.
    pub password_hash: String,
    /// Exactly one role per user; may be unset pending assignment.
    pub role_id: Option<RoleId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: &str, password_hash: String, role_id: Option<RoleId>) -> DomainResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: UserId::new(),
            email: canonicalize_email(email)?,
            password_hash,
            role_id,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A user with its role eagerly attached.
///
/// This is what credential lookups return: the attached role is part of the
/// store method's contract, not an implicit loading behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithRole {
    pub user: User,
    pub role: Option<Role>,
}

/// Client-facing projection of a user: everything except the credential.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub role: Option<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserView {
    pub fn from_record(record: &UserWithRole) -> Self {
        Self {
            id: record.user.id,
            email: record.user.email.clone(),
            role: record.role.clone(),
            created_at: record.user.created_at,
            updated_at: record.user.updated_at,
        }
    }
}
