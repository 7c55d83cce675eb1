//! Session-scoped permission store.
//!
//! The store is the only writer of [`PermissionState`]. Everything else reads
//! snapshots or subscribes to changes. Construct one per session and drop it
//! (after [`PermissionStore::clear`]) at logout.

use std::sync::Arc;

use tokio::sync::watch;

use backoffice_auth::{PermissionSet, PermissionState, PermissionStatus, RecoveredState, recover_state};

use crate::client::{ApiError, PermissionSource};
use crate::storage::TokenStorage;

pub struct PermissionStore<S> {
    source: S,
    tokens: Arc<dyn TokenStorage>,
    token_key: String,
    state: watch::Sender<PermissionState>,
}

impl<S: PermissionSource> PermissionStore<S> {
    pub fn new(source: S, tokens: Arc<dyn TokenStorage>, token_key: impl Into<String>) -> Self {
        let (state, _) = watch::channel(PermissionState::uninitialized());
        Self {
            source,
            tokens,
            token_key: token_key.into(),
            state,
        }
    }

    /// Current state (cloned snapshot).
    pub fn state(&self) -> PermissionState {
        self.state.borrow().clone()
    }

    /// Change stream; receivers see every status transition.
    pub fn subscribe(&self) -> watch::Receiver<PermissionState> {
        self.state.subscribe()
    }

    /// True if an auth token is stored at all.
    pub fn has_credential(&self) -> bool {
        self.tokens
            .get(&self.token_key)
            .is_some_and(|t| !t.trim().is_empty())
    }

    /// Fetch the user's role and permission codes.
    ///
    /// Never fails: a failed fetch degrades to whatever the stored token's
    /// role claim allows and ends in `Failed`. The returned status is always
    /// terminal.
    pub async fn load(&self) -> PermissionStatus {
        self.state.send_modify(|s| s.status = PermissionStatus::Loading);

        let next = match self.source.fetch_my_permissions().await {
            Ok(payload) => {
                let state = payload.into_state();
                tracing::info!(
                    role = state.role.as_ref().map(|r| r.as_str()),
                    user_id = state.user_id.map(tracing::field::display),
                    permissions = state.permissions.len(),
                    "permissions loaded"
                );
                state
            }
            Err(err) => self.degraded(&err),
        };

        let status = next.status.clone();
        self.state.send_replace(next);
        status
    }

    /// Manual refresh; same semantics as [`load`](Self::load).
    pub async fn reload(&self) -> PermissionStatus {
        tracing::debug!("reloading permissions");
        self.load().await
    }

    /// Logout: forget the token and reset to an empty state.
    pub fn clear(&self) {
        self.tokens.remove(&self.token_key);
        self.state.send_replace(PermissionState::uninitialized());
    }

    fn degraded(&self, err: &ApiError) -> PermissionState {
        let token = self.tokens.get(&self.token_key);

        match recover_state(token.as_deref()) {
            Ok(RecoveredState { role, permissions }) => {
                tracing::warn!(error = %err, role = %role, "permission fetch failed; using role from token");
                PermissionState::failed(Some(role), permissions, err.to_string())
            }
            Err(decode_err) => {
                tracing::warn!(error = %err, decode_error = %decode_err, "permission fetch failed; no usable role");
                PermissionState::failed(None, PermissionSet::empty(), format!("{err}; {decode_err}"))
            }
        }
    }
}
