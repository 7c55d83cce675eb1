use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PermissionSet, Role, UserId};

/// Lifecycle of the session's permission data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum PermissionStatus {
    /// Nothing fetched yet (session just started).
    #[default]
    Uninitialized,
    /// A fetch is in flight.
    Loading,
    /// Fetched from the backend; the data is complete.
    Ready,
    /// The fetch failed; role and codes are a best-effort recovery.
    Failed(String),
}

impl PermissionStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Ready or Failed: nobody should still be waiting on a fetch.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Everything the gate knows about the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionState {
    pub role: Option<Role>,
    pub user_id: Option<UserId>,
    pub permissions: PermissionSet,
    pub status: PermissionStatus,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl PermissionState {
    /// Empty state at session start.
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// Complete state from a successful fetch.
    pub fn ready(role: Option<Role>, user_id: Option<UserId>, permissions: PermissionSet) -> Self {
        Self {
            role,
            user_id,
            permissions,
            status: PermissionStatus::Ready,
            loaded_at: Some(Utc::now()),
        }
    }

    /// Degraded state after a failed fetch.
    pub fn failed(role: Option<Role>, permissions: PermissionSet, reason: impl Into<String>) -> Self {
        Self {
            role,
            user_id: None,
            permissions,
            status: PermissionStatus::Failed(reason.into()),
            loaded_at: Some(Utc::now()),
        }
    }

    pub fn is_privileged(&self) -> bool {
        self.role.as_ref().is_some_and(Role::is_privileged)
    }
}
