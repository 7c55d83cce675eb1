use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role code as issued by the backend (`rol`).
///
/// Roles stay opaque strings at this layer; only the privileged role has
/// meaning here, because it implicitly satisfies every permission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const SUPERADMIN: Role = Role(Cow::Borrowed("SUPERADMIN"));
    pub const ADMIN: Role = Role(Cow::Borrowed("ADMIN"));
    pub const GERENTE: Role = Role(Cow::Borrowed("GERENTE"));
    pub const VENTAS: Role = Role(Cow::Borrowed("VENTAS"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The super-role bypasses every permission check.
    pub fn is_privileged(&self) -> bool {
        self.as_str() == Self::SUPERADMIN.as_str()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
