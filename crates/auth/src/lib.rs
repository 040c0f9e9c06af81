//! `taskforge-auth` — authentication/authorization core (RBAC).
//!
//! This crate knows nothing about HTTP; storage sits behind the
//! [`CredentialStore`] trait.

pub mod authorize;
pub mod error;
pub mod password;
pub mod permissions;
pub mod principal;
pub mod registry;
pub mod role;
pub mod service;
pub mod store;
pub mod token;
pub mod user;

pub use authorize::authorize;
pub use error::AuthError;
pub use password::PasswordHasher;
pub use permissions::{PermissionMap, Requirement, RequiredPermission};
pub use principal::Principal;
pub use registry::RequirementRegistry;
pub use role::Role;
pub use service::{AuthConfig, AuthService, NewUser, TokenGrant, UpdateRole, UpdateUser};
pub use store::CredentialStore;
pub use token::{AccessClaims, TokenError, TokenIssuer, TokenVerifier};
pub use user::{User, UserView, UserWithRole, canonicalize_email};
