use serde::{Deserialize, Serialize};

use taskforge_core::UserId;

use crate::permissions::PermissionMap;
use crate::role::Role;
use crate::user::User;

/// The authenticated identity used during request processing.
///
/// Derived, never persisted: built either from a fresh credential check or
/// from a decoded token. The permission mapping is a **snapshot**: a copy of
/// the role's grants at authentication time. Later edits to the underlying
/// role do not show up here; they take effect when the user next
/// authenticates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub email: String,
    /// Role name at authentication time, if a role was assigned.
    pub role: Option<String>,
    /// Snapshot of the role's permission mapping. Empty when no role.
    pub permissions: PermissionMap,
}

impl Principal {
    /// Snapshot a principal from a user and its attached role.
    pub fn from_user(user: &User, role: Option<&Role>) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: role.map(|r| r.name.clone()),
            permissions: role.map(|r| r.permissions.clone()).unwrap_or_default(),
        }
    }
}
