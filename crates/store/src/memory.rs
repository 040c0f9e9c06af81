//! In-memory credential store for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;

use taskforge_core::{RoleId, UserId};

use taskforge_auth::{
    AuthError, CredentialStore, PasswordHasher, Role, User, UserWithRole,
};

/// RwLock-backed credential store.
///
/// Owns the password hasher: every `save_user` runs the password field
/// through the idempotence-guarded hash path, so this store is the sole
/// writer of hashes regardless of what callers hand it.
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<UserId, User>>,
    roles: RwLock<HashMap<RoleId, Role>>,
    hasher: PasswordHasher,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::with_hasher(PasswordHasher::new())
    }

    /// Store with an explicit hasher (tests use cheap cost parameters).
    pub fn with_hasher(hasher: PasswordHasher) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            roles: RwLock::new(HashMap::new()),
            hasher,
        }
    }

    fn attach_role(&self, user: User) -> Result<UserWithRole, AuthError> {
        let role = match user.role_id {
            Some(role_id) => self.find_role_by_id(role_id)?,
            None => None,
        };
        Ok(UserWithRole { user, role })
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned(_: impl std::fmt::Debug) -> AuthError {
    AuthError::Storage("store lock poisoned".to_string())
}

impl CredentialStore for InMemoryCredentialStore {
    fn find_user_by_email(&self, email: &str) -> Result<Option<UserWithRole>, AuthError> {
        let user = {
            let users = self.users.read().map_err(poisoned)?;
            users.values().find(|u| u.email == email).cloned()
        };
        user.map(|u| self.attach_role(u)).transpose()
    }

    fn find_user_by_id(&self, id: UserId) -> Result<Option<UserWithRole>, AuthError> {
        let user = {
            let users = self.users.read().map_err(poisoned)?;
            users.get(&id).cloned()
        };
        user.map(|u| self.attach_role(u)).transpose()
    }

    fn list_users(&self) -> Result<Vec<UserWithRole>, AuthError> {
        let mut users: Vec<User> = {
            let users = self.users.read().map_err(poisoned)?;
            users.values().cloned().collect()
        };
        users.sort_by_key(|u| u.created_at);

        users.into_iter().map(|u| self.attach_role(u)).collect()
    }

    fn delete_user(&self, id: UserId) -> Result<(), AuthError> {
        let mut users = self.users.write().map_err(poisoned)?;
        match users.remove(&id) {
            Some(_) => Ok(()),
            None => Err(AuthError::NotFound(format!("user {id} not found"))),
        }
    }

    fn find_role_by_id(&self, id: RoleId) -> Result<Option<Role>, AuthError> {
        let roles = self.roles.read().map_err(poisoned)?;
        Ok(roles.get(&id).cloned())
    }

    fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, AuthError> {
        let roles = self.roles.read().map_err(poisoned)?;
        Ok(roles.values().find(|r| r.name == name).cloned())
    }

    fn list_roles(&self) -> Result<Vec<Role>, AuthError> {
        let mut roles: Vec<Role> = {
            let roles = self.roles.read().map_err(poisoned)?;
            roles.values().cloned().collect()
        };
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    fn save_user(&self, mut user: User) -> Result<User, AuthError> {
        // Guarded hash path: an already-hashed value passes through
        // unchanged; a plaintext never reaches the map raw.
        user.password_hash = self.hasher.hash(&user.password_hash)?;

        let mut users = self.users.write().map_err(poisoned)?;
        let taken = users
            .values()
            .any(|u| u.email == user.email && u.id != user.id);
        if taken {
            return Err(AuthError::Conflict(format!(
                "email '{}' already in use",
                user.email
            )));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    fn save_role(&self, role: Role) -> Result<Role, AuthError> {
        let mut roles = self.roles.write().map_err(poisoned)?;
        let taken = roles
            .values()
            .any(|r| r.name == role.name && r.id != role.id);
        if taken {
            return Err(AuthError::Conflict(format!(
                "role '{}' already exists",
                role.name
            )));
        }

        roles.insert(role.id, role.clone());
        Ok(role)
    }
}
