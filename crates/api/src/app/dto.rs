use serde::Deserialize;

use taskforge_auth::PermissionMap;

// -------------------------
// Request DTOs
// -------------------------
//
// Registration, user creation, and partial updates deserialize straight into
// the service's own input types (`NewUser`, `UpdateUser`, `UpdateRole`).

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub permissions: PermissionMap,
}
