//! Storage boundary consumed by the auth core.

use std::sync::Arc;

use taskforge_core::{RoleId, UserId};

use crate::error::AuthError;
use crate::role::Role;
use crate::user::{User, UserWithRole};

/// Persistence boundary for users and roles.
///
/// The store is the sole writer of password hashes: `save_user` must pass the
/// password field through the idempotence-guarded hasher on every write, so
/// an already-hashed value round-trips unchanged and a plaintext one never
/// reaches storage raw.
///
/// Lookups that return a user attach the role eagerly; the `UserWithRole`
/// return type makes the join part of the contract rather than a loading
/// option callers can forget.
pub trait CredentialStore: Send + Sync {
    /// Find a user by canonical email, role attached.
    fn find_user_by_email(&self, email: &str) -> Result<Option<UserWithRole>, AuthError>;

    /// Find a user by id, role attached.
    fn find_user_by_id(&self, id: UserId) -> Result<Option<UserWithRole>, AuthError>;

    /// All users, roles attached.
    fn list_users(&self) -> Result<Vec<UserWithRole>, AuthError>;

    /// Delete a user. `NotFound` if absent.
    fn delete_user(&self, id: UserId) -> Result<(), AuthError>;

    fn find_role_by_id(&self, id: RoleId) -> Result<Option<Role>, AuthError>;

    fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, AuthError>;

    fn list_roles(&self) -> Result<Vec<Role>, AuthError>;

    /// Insert or update a user. Enforces email uniqueness (`Conflict`) and
    /// runs the password field through the guarded hash path.
    fn save_user(&self, user: User) -> Result<User, AuthError>;

    /// Insert or update a role. Enforces name uniqueness (`Conflict`).
    fn save_role(&self, role: Role) -> Result<Role, AuthError>;
}

impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    fn find_user_by_email(&self, email: &str) -> Result<Option<UserWithRole>, AuthError> {
        (**self).find_user_by_email(email)
    }

    fn find_user_by_id(&self, id: UserId) -> Result<Option<UserWithRole>, AuthError> {
        (**self).find_user_by_id(id)
    }

    fn list_users(&self) -> Result<Vec<UserWithRole>, AuthError> {
        (**self).list_users()
    }

    fn delete_user(&self, id: UserId) -> Result<(), AuthError> {
        (**self).delete_user(id)
    }

    fn find_role_by_id(&self, id: RoleId) -> Result<Option<Role>, AuthError> {
        (**self).find_role_by_id(id)
    }

    fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, AuthError> {
        (**self).find_role_by_name(name)
    }

    fn list_roles(&self) -> Result<Vec<Role>, AuthError> {
        (**self).list_roles()
    }

    fn save_user(&self, user: User) -> Result<User, AuthError> {
        (**self).save_user(user)
    }

    fn save_role(&self, role: Role) -> Result<Role, AuthError> {
        (**self).save_role(role)
    }
}
