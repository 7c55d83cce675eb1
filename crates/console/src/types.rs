//! Wire types shared by the native client and the wasm frontend.
//!
//! These must not depend on native-only crates.

use serde::{Deserialize, Serialize};

use backoffice_auth::{PermissionSet, PermissionState, Role, UserId};

/// Response of `GET /permisos/mis-permisos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyPermissions {
    pub permisos: Vec<String>,
    pub rol: String,
    pub usuario_id: i64,
}

impl MyPermissions {
    /// Convert into a complete (`Ready`) state. The code list replaces
    /// whatever was there before.
    pub fn into_state(self) -> PermissionState {
        let role = (!self.rol.trim().is_empty()).then(|| Role::new(self.rol));
        let permissions: PermissionSet = self.permisos.into_iter().collect();
        PermissionState::ready(role, Some(UserId::new(self.usuario_id)), permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_payload() {
        let body = r#"{"permisos":["productos.ver","admin.gestionar_pms","productos.ver"],"rol":"GERENTE","usuario_id":42}"#;
        let parsed: MyPermissions = serde_json::from_str(body).unwrap();
        let state = parsed.into_state();

        assert!(state.status.is_ready());
        assert_eq!(state.role, Some(Role::GERENTE));
        assert_eq!(state.user_id, Some(UserId::new(42)));
        assert_eq!(state.permissions.sorted(), vec!["admin.gestionar_pms", "productos.ver"]);
    }

    #[test]
    fn blank_role_becomes_none() {
        let state = MyPermissions {
            permisos: vec![],
            rol: String::new(),
            usuario_id: 1,
        }
        .into_state();
        assert_eq!(state.role, None);
    }
}
