use serde::{Deserialize, Serialize};

use crate::{Permission, PermissionState, Role, query};

/// What a guarded route requires.
///
/// Exactly three shapes exist; evaluation is exhaustive over them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessCondition {
    /// Legacy gate: the session's role must be in the list.
    RoleAllowlist(Vec<Role>),
    /// One permission code.
    SinglePermission(Permission),
    /// Several codes, with "any" or "all" semantics.
    PermissionList {
        permissions: Vec<Permission>,
        require_all: bool,
    },
}

impl AccessCondition {
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::RoleAllowlist(roles.into_iter().collect())
    }

    pub fn permission(code: impl Into<Permission>) -> Self {
        Self::SinglePermission(code.into())
    }

    pub fn any_of<P: Into<Permission>>(codes: impl IntoIterator<Item = P>) -> Self {
        Self::PermissionList {
            permissions: codes.into_iter().map(Into::into).collect(),
            require_all: false,
        }
    }

    pub fn all_of<P: Into<Permission>>(codes: impl IntoIterator<Item = P>) -> Self {
        Self::PermissionList {
            permissions: codes.into_iter().map(Into::into).collect(),
            require_all: true,
        }
    }

    /// Evaluate against the current state. The privileged role always passes.
    pub fn is_satisfied_by(&self, state: &PermissionState) -> bool {
        match self {
            Self::RoleAllowlist(roles) => {
                state.is_privileged()
                    || state.role.as_ref().is_some_and(|role| roles.contains(role))
            }
            Self::SinglePermission(code) => query::has(state, code.as_str()),
            Self::PermissionList {
                permissions,
                require_all: true,
            } => query::has_all(state, &codes(permissions)),
            Self::PermissionList {
                permissions,
                require_all: false,
            } => query::has_any(state, &codes(permissions)),
        }
    }

    /// Codes referenced by this condition that the state does not grant.
    pub fn missing(&self, state: &PermissionState) -> Vec<Permission> {
        if state.is_privileged() {
            return Vec::new();
        }
        match self {
            Self::RoleAllowlist(_) => Vec::new(),
            Self::SinglePermission(code) => {
                if state.permissions.contains(code.as_str()) {
                    Vec::new()
                } else {
                    vec![code.clone()]
                }
            }
            Self::PermissionList { permissions, .. } => permissions
                .iter()
                .filter(|p| !state.permissions.contains(p.as_str()))
                .cloned()
                .collect(),
        }
    }
}

fn codes(permissions: &[Permission]) -> Vec<&str> {
    permissions.iter().map(Permission::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PermissionSet;

    fn ready(role: Role, codes: &[&'static str]) -> PermissionState {
        PermissionState::ready(Some(role), None, codes.iter().copied().collect())
    }

    #[test]
    fn role_allowlist() {
        let cond = AccessCondition::roles([Role::ADMIN, Role::GERENTE]);
        assert!(cond.is_satisfied_by(&ready(Role::GERENTE, &[])));
        assert!(!cond.is_satisfied_by(&ready(Role::VENTAS, &["productos.ver"])));
        assert!(cond.is_satisfied_by(&ready(Role::SUPERADMIN, &[])));
        assert!(!cond.is_satisfied_by(&PermissionState::uninitialized()));
    }

    #[test]
    fn single_permission() {
        let cond = AccessCondition::permission("productos.ver_tienda");
        assert!(!cond.is_satisfied_by(&ready(Role::GERENTE, &["productos.ver"])));
        assert!(cond.is_satisfied_by(&ready(Role::GERENTE, &["productos.ver_tienda"])));
    }

    #[test]
    fn permission_list_any_and_all() {
        let state = ready(Role::VENTAS, &["pedidos.ver"]);
        assert!(AccessCondition::any_of(["pedidos.ver", "etiquetas.ver"]).is_satisfied_by(&state));
        assert!(!AccessCondition::all_of(["pedidos.ver", "etiquetas.ver"]).is_satisfied_by(&state));
    }

    #[test]
    fn superadmin_passes_require_all() {
        let state = PermissionState::ready(Some(Role::SUPERADMIN), None, PermissionSet::empty());
        assert!(AccessCondition::all_of(["x.y"]).is_satisfied_by(&state));
    }

    #[test]
    fn missing_lists_absent_codes() {
        let state = ready(Role::VENTAS, &["pedidos.ver"]);
        let cond = AccessCondition::all_of(["pedidos.ver", "etiquetas.ver", "alertas.ver"]);
        let missing: Vec<_> = cond.missing(&state).iter().map(|p| p.to_string()).collect();
        assert_eq!(missing, vec!["etiquetas.ver", "alertas.ver"]);
    }

    #[test]
    fn deserializes_from_route_config() {
        let cond: AccessCondition = serde_json::from_value(serde_json::json!({
            "permission_list": { "permissions": ["a.ver", "b.ver"], "require_all": true }
        }))
        .unwrap();
        assert_eq!(cond, AccessCondition::all_of(["a.ver", "b.ver"]));
    }
}
