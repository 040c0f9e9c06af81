//! Credential validation, registration, and token issuance flows.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use taskforge_core::{RoleId, UserId};

use crate::error::AuthError;
use crate::password::PasswordHasher;
use crate::permissions::PermissionMap;
use crate::principal::Principal;
use crate::role::Role;
use crate::store::CredentialStore;
use crate::token::{TokenIssuer, TokenVerifier};
use crate::user::{User, UserView, UserWithRole, canonicalize_email};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Auth configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub token_ttl_secs: i64,
    /// Role assigned to registrations that do not name one. Policy: the
    /// lowest-privilege role.
    pub default_role: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "taskforge-dev-secret-change-me".to_string(),
            token_ttl_secs: 86400, // 24h
            default_role: "viewer".to_string(),
        }
    }
}

/// Input for registration and administrative user creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role_id: Option<RoleId>,
}

/// Partial update of a user record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role_id: Option<RoleId>,
}

/// Partial update of a role record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRole {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub permissions: Option<PermissionMap>,
}

/// What a successful registration or login returns: a bearer token plus the
/// hash-stripped user record. Registration and login converge on the same
/// issuing step, so both produce this exact shape.
#[derive(Debug, Serialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserView,
}

/// The auth core's service facade: everything the routing layer calls.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    default_role: String,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, config: AuthConfig) -> Self {
        Self {
            store,
            hasher: PasswordHasher::new(),
            issuer: TokenIssuer::new(&config.jwt_secret, config.token_ttl_secs),
            verifier: TokenVerifier::new(&config.jwt_secret),
            default_role: config.default_role,
        }
    }

    /// Replace the password hasher (tests use cheap cost parameters).
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    // ── Authentication ──────────────────────────────────────────────────────

    /// Validate email + password into a principal.
    ///
    /// Unknown email and wrong password fail with the identically-shaped
    /// [`AuthError::InvalidCredentials`]; nothing reveals which factor was
    /// wrong.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let record = self.validate_credentials(email, password)?;
        Ok(Principal::from_user(&record.user, record.role.as_ref()))
    }

    /// Register a new account and log it in.
    pub fn register(&self, input: NewUser) -> Result<TokenGrant, AuthError> {
        let record = self.provision_user(input)?;
        self.grant_for(&record)
    }

    /// Authenticate and issue a token via the same issuing step registration
    /// ends in.
    pub fn login(&self, email: &str, password: &str) -> Result<TokenGrant, AuthError> {
        let record = self.validate_credentials(email, password)?;
        self.grant_for(&record)
    }

    /// Decode a bearer token into a principal. Runs before every protected
    /// handler; never consults the store.
    pub fn principal_from_token(&self, raw: &str) -> Result<Principal, AuthError> {
        Ok(self.verifier.decode(raw)?)
    }

    fn validate_credentials(&self, email: &str, password: &str) -> Result<UserWithRole, AuthError> {
        // A malformed email can't belong to anyone; same failure shape.
        let canonical =
            canonicalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(record) = self.store.find_user_by_email(&canonical)? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &record.user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(record)
    }

    fn grant_for(&self, record: &UserWithRole) -> Result<TokenGrant, AuthError> {
        let principal = Principal::from_user(&record.user, record.role.as_ref());
        let access_token = self.issuer.issue(&principal)?;

        Ok(TokenGrant {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.issuer.ttl_secs(),
            user: UserView::from_record(record),
        })
    }

    /// Shared creation path for registration and administrative creates:
    /// uniqueness check, role resolution (explicit id or the configured
    /// default), hashing, persistence.
    fn provision_user(&self, input: NewUser) -> Result<UserWithRole, AuthError> {
        let email = canonicalize_email(&input.email)?;

        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        if self.store.find_user_by_email(&email)?.is_some() {
            return Err(AuthError::Conflict("user already exists".to_string()));
        }

        let role = match input.role_id {
            Some(id) => Some(
                self.store
                    .find_role_by_id(id)?
                    .ok_or_else(|| AuthError::NotFound(format!("role {id} not found")))?,
            ),
            None => Some(
                self.store
                    .find_role_by_name(&self.default_role)?
                    .ok_or_else(|| {
                        AuthError::Internal(format!(
                            "default role '{}' is not provisioned",
                            self.default_role
                        ))
                    })?,
            ),
        };

        let password_hash = self.hasher.hash(&input.password)?;
        let user = User::new(&email, password_hash, role.as_ref().map(|r| r.id))?;
        let user = self.store.save_user(user)?;

        Ok(UserWithRole { user, role })
    }

    // ── User management ─────────────────────────────────────────────────────

    /// Create a user without logging it in (administrative path). Same
    /// conflict/role semantics as registration.
    pub fn create_user(&self, input: NewUser) -> Result<UserView, AuthError> {
        let record = self.provision_user(input)?;
        Ok(UserView::from_record(&record))
    }

    pub fn list_users(&self) -> Result<Vec<UserView>, AuthError> {
        let users = self.store.list_users()?;
        Ok(users.iter().map(UserView::from_record).collect())
    }

    pub fn get_user(&self, id: UserId) -> Result<UserView, AuthError> {
        let record = self
            .store
            .find_user_by_id(id)?
            .ok_or_else(|| AuthError::NotFound(format!("user {id} not found")))?;
        Ok(UserView::from_record(&record))
    }

    /// Apply a partial update.
    ///
    /// An unchanged record's password hash flows back through `save_user`
    /// untouched; the idempotence guard is what keeps that safe.
    pub fn update_user(&self, id: UserId, patch: UpdateUser) -> Result<UserView, AuthError> {
        let Some(mut record) = self.store.find_user_by_id(id)? else {
            return Err(AuthError::NotFound(format!("user {id} not found")));
        };

        if let Some(email) = patch.email {
            let canonical = canonicalize_email(&email)?;
            if canonical != record.user.email {
                if self.store.find_user_by_email(&canonical)?.is_some() {
                    return Err(AuthError::Conflict("email already in use".to_string()));
                }
                record.user.email = canonical;
            }
        }

        if let Some(role_id) = patch.role_id {
            let role = self
                .store
                .find_role_by_id(role_id)?
                .ok_or_else(|| AuthError::NotFound(format!("role {role_id} not found")))?;
            record.user.role_id = Some(role.id);
            record.role = Some(role);
        }

        if let Some(password) = patch.password {
            if password.len() < MIN_PASSWORD_LEN {
                return Err(AuthError::Validation(format!(
                    "password must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }
            record.user.password_hash = self.hasher.hash(&password)?;
        }

        record.user.touch();
        let user = self.store.save_user(record.user)?;
        Ok(UserView::from_record(&UserWithRole {
            user,
            role: record.role,
        }))
    }

    pub fn remove_user(&self, id: UserId) -> Result<(), AuthError> {
        self.store.delete_user(id)
    }

    // ── Role management ─────────────────────────────────────────────────────

    pub fn create_role(&self, name: &str, permissions: PermissionMap) -> Result<Role, AuthError> {
        let role = Role::new(name, permissions)?;
        if self.store.find_role_by_name(&role.name)?.is_some() {
            return Err(AuthError::Conflict(format!(
                "role '{}' already exists",
                role.name
            )));
        }
        self.store.save_role(role)
    }

    pub fn list_roles(&self) -> Result<Vec<Role>, AuthError> {
        self.store.list_roles()
    }

    pub fn get_role(&self, id: RoleId) -> Result<Role, AuthError> {
        self.store
            .find_role_by_id(id)?
            .ok_or_else(|| AuthError::NotFound(format!("role {id} not found")))
    }

    /// Edit a role's name or permission mapping.
    ///
    /// Does not touch tokens already in flight: principals authorized before
    /// the edit keep their issued snapshot until they re-authenticate.
    pub fn update_role(&self, id: RoleId, patch: UpdateRole) -> Result<Role, AuthError> {
        let mut role = self.get_role(id)?;

        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AuthError::Validation("role name cannot be empty".to_string()));
            }
            if name != role.name && self.store.find_role_by_name(&name)?.is_some() {
                return Err(AuthError::Conflict(format!("role '{name}' already exists")));
            }
            role.name = name;
        }

        if let Some(permissions) = patch.permissions {
            role.permissions = permissions;
        }

        self.store.save_role(role)
    }
}
