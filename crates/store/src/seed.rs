//! Idempotent seed data: the three stock roles and their demo accounts.

use taskforge_auth::{AuthError, CredentialStore, PermissionMap, Role, User};

/// Ensure the stock roles exist. Safe to run on every startup; existing
/// roles are left untouched.
///
/// `viewer` is the lowest-privilege role and the registration default.
pub fn seed_roles(store: &dyn CredentialStore) -> Result<(), AuthError> {
    let defaults = [
        (
            "admin",
            PermissionMap::new()
                .with("users", &["create", "read", "update", "delete"])
                .with("roles", &["create", "read", "update", "delete"])
                .with("projects", &["create", "read", "update", "delete"])
                .with("tasks", &["create", "read", "update", "delete"]),
        ),
        (
            "editor",
            PermissionMap::new()
                .with("projects", &["create", "read", "update"])
                .with("tasks", &["create", "read", "update", "delete"]),
        ),
        (
            "viewer",
            PermissionMap::new()
                .with("projects", &["read"])
                .with("tasks", &["read"]),
        ),
    ];

    for (name, permissions) in defaults {
        if store.find_role_by_name(name)?.is_none() {
            store.save_role(Role::new(name, permissions)?)?;
            tracing::info!(role = name, "seeded role");
        }
    }

    Ok(())
}

/// Ensure the demo accounts exist, one per stock role. Plaintext passwords
/// go through `save_user`, whose guarded hash path stores only the hash.
pub fn seed_users(store: &dyn CredentialStore) -> Result<(), AuthError> {
    let defaults = [
        ("admin@test.com", "admin123", "admin"),
        ("editor@test.com", "editor123", "editor"),
        ("viewer@test.com", "viewer123", "viewer"),
    ];

    for (email, password, role_name) in defaults {
        if store.find_user_by_email(email)?.is_some() {
            continue;
        }

        let role = store.find_role_by_name(role_name)?.ok_or_else(|| {
            AuthError::Internal(format!("role '{role_name}' must be seeded before users"))
        })?;

        store.save_user(User::new(email, password.to_string(), Some(role.id))?)?;
        tracing::info!(email, role = role_name, "seeded user");
    }

    Ok(())
}
