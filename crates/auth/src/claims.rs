//! Best-effort recovery from the stored auth token.
//!
//! Used only when the permissions endpoint cannot be reached. The token is
//! decoded without verifying its signature: the client never trusts it for
//! anything beyond picking a degraded role, and the server still checks every
//! request.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::{PermissionSet, Role};

/// Subset of the backend's token claims the console cares about.
#[derive(Debug, Clone, Deserialize)]
struct RoleClaims {
    #[serde(alias = "role")]
    rol: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimDecodeError {
    #[error("no auth token stored")]
    MissingToken,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token carries no role claim")]
    MissingRole,
}

/// Role and permission set rebuilt from a token alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredState {
    pub role: Role,
    pub permissions: PermissionSet,
}

/// Decode the role claim from a JWT without signature verification.
pub fn decode_role_claim(token: &str) -> Result<Role, ClaimDecodeError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ClaimDecodeError::MissingToken);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<RoleClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| ClaimDecodeError::Malformed(e.to_string()))?;

    match data.claims.rol {
        Some(rol) if !rol.trim().is_empty() => Ok(Role::new(rol)),
        _ => Err(ClaimDecodeError::MissingRole),
    }
}

/// Rebuild a degraded state from the token: the privileged role gets the
/// wildcard set, everyone else gets nothing.
pub fn recover_state(token: Option<&str>) -> Result<RecoveredState, ClaimDecodeError> {
    let role = decode_role_claim(token.ok_or(ClaimDecodeError::MissingToken)?)?;

    let permissions = if role.is_privileged() {
        PermissionSet::wildcard()
    } else {
        PermissionSet::empty()
    };

    tracing::debug!(role = %role, wildcard = permissions.has_wildcard(), "recovered role from token");
    Ok(RecoveredState { role, permissions })
}
