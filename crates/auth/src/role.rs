use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskforge_core::{DomainError, DomainResult, RoleId};

use crate::permissions::PermissionMap;

/// A named permission bundle.
///
/// Roles are shared by many users; a user holds a reference, not a copy.
/// Tokens, by contrast, embed a copy of the mapping at issuance time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    /// Unique name (e.g. "admin", "editor", "viewer").
    pub name: String,
    /// Resource → allowed actions. Always present; defaults to empty.
    #[serde(default)]
    pub permissions: PermissionMap,
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn new(name: &str, permissions: PermissionMap) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("role name cannot be empty"));
        }

        Ok(Self {
            id: RoleId::new(),
            name: name.to_string(),
            permissions,
            created_at: Utc::now(),
        })
    }
}
