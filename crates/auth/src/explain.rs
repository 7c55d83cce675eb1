//! Authorization explanation (debug trail).
//!
//! Answers "why was this route allowed or denied?" for logs and the
//! diagnostic binary. It never changes a decision.

use serde::Serialize;

use crate::{AccessCondition, PermissionState};

/// Detailed explanation of one guard decision.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub granted: bool,
    pub reason: String,
    pub role: Option<String>,
    pub effective_permissions: Vec<String>,
    pub has_wildcard: bool,
    pub missing: Vec<String>,
    pub degraded: bool,
}

/// Explain how `condition` evaluates against `state`.
pub fn explain(state: &PermissionState, condition: &AccessCondition) -> Explanation {
    let granted = condition.is_satisfied_by(state);
    let missing: Vec<String> = condition
        .missing(state)
        .iter()
        .map(|p| p.as_str().to_string())
        .collect();

    let reason = if state.is_privileged() {
        "privileged role satisfies every permission".to_string()
    } else if state.permissions.has_wildcard() && !matches!(condition, AccessCondition::RoleAllowlist(_)) {
        "permission set carries the wildcard '*'".to_string()
    } else {
        match (condition, granted) {
            (AccessCondition::RoleAllowlist(roles), true) => {
                format!("role is one of {:?}", roles.iter().map(|r| r.as_str()).collect::<Vec<_>>())
            }
            (AccessCondition::RoleAllowlist(roles), false) => format!(
                "role {} is not one of {:?}",
                state.role.as_ref().map_or("<none>", |r| r.as_str()),
                roles.iter().map(|r| r.as_str()).collect::<Vec<_>>()
            ),
            (AccessCondition::SinglePermission(code), true) => format!("has '{code}'"),
            (AccessCondition::SinglePermission(code), false) => format!("missing '{code}'"),
            (AccessCondition::PermissionList { require_all, .. }, true) => {
                if *require_all {
                    "has every required permission".to_string()
                } else {
                    "has at least one of the listed permissions".to_string()
                }
            }
            (AccessCondition::PermissionList { require_all, .. }, false) => {
                if *require_all {
                    format!("missing {missing:?}")
                } else {
                    format!("has none of {missing:?}")
                }
            }
        }
    };

    Explanation {
        granted,
        reason,
        role: state.role.as_ref().map(|r| r.as_str().to_string()),
        effective_permissions: state.permissions.sorted().into_iter().map(str::to_string).collect(),
        has_wildcard: state.permissions.has_wildcard(),
        missing,
        degraded: state.status.is_degraded(),
    }
}
