use std::borrow::{Borrow, Cow};
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Permission code.
///
/// Codes are opaque dot-namespaced strings (e.g. "productos.ver",
/// "admin.gestionar_pms"). The special wildcard `"*"` stands for
/// "every permission"; it is the same convention the backend uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: Permission = Permission(Cow::Borrowed("*"));

    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Permission {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// The set of permission codes granted to a session.
///
/// Built once per fetch and replaced wholesale; there is no API for adding or
/// removing individual codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(HashSet<Permission>);

impl PermissionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sentinel set used when the privileged role is recovered offline.
    pub fn wildcard() -> Self {
        Self(HashSet::from([Permission::WILDCARD]))
    }

    /// True if `code` is present or the set carries the wildcard.
    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code) || self.has_wildcard()
    }

    pub fn has_wildcard(&self) -> bool {
        self.0.contains(Permission::WILDCARD.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }

    /// Codes in lexical order (for logs and diagnostics).
    pub fn sorted(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.0.iter().map(Permission::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

impl<P: Into<Permission>> FromIterator<P> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
