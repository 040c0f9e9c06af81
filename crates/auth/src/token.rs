//! Token issuance and validation (HS256 JWT).
//!
//! Tokens are self-contained: the permission snapshot rides inside the
//! claims, so validation never touches the credential store. Authorization
//! for the lifetime of a token is therefore a point-in-time view: role
//! edits land on the next authentication, not retroactively.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use taskforge_core::UserId;

use crate::permissions::PermissionMap;
use crate::principal::Principal;

/// Claim set embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user id.
    pub sub: UserId,
    pub email: String,
    /// Role name at issuance, if any.
    pub role: Option<String>,
    /// Deep copy of the role's permission mapping at issuance.
    pub permissions: PermissionMap,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

impl AccessClaims {
    /// Rebuild a principal straight from the embedded claims.
    pub fn into_principal(self) -> Principal {
        Principal {
            id: self.sub,
            email: self.email,
            role: self.role,
            permissions: self.permissions,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Any decode failure (bad signature, expired, malformed) collapses
    /// here. Callers are not told which check failed.
    #[error("unauthorized")]
    Unauthorized,

    /// Issuance-side encoding failure.
    #[error("token encoding failed: {0}")]
    Encode(String),
}

/// Mints signed, time-bounded access tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Sign a token embedding the principal's identity and permission
    /// snapshot, valid for the configured TTL from now.
    pub fn issue(&self, principal: &Principal) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: principal.id,
            email: principal.email.clone(),
            role: principal.role.clone(),
            permissions: principal.permissions.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }
}

/// Validates and decodes access tokens.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Expiry means expiry; no grace window.
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Decode a raw bearer token into a principal.
    ///
    /// Signature, expiry, and claim-shape checks all collapse into the same
    /// [`TokenError::Unauthorized`]; the store is never consulted.
    pub fn decode(&self, token: &str) -> Result<Principal, TokenError> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.into_principal())
            .map_err(|_| TokenError::Unauthorized)
    }
}
