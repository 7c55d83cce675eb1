//! Landing page selection for `/`.
//!
//! Walks a fixed priority table and redirects to the first page the user may
//! see. An empty permission set right after loading is treated as a possible
//! race with the backend and re-fetched a bounded number of times.

use std::borrow::Cow;
use std::time::Duration;

use backoffice_auth::{AccessCondition, PermissionState};

/// Bounded, fixed-delay retry for empty permission sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            delay: Self::DEFAULT_DELAY,
        }
    }
}

/// One row of the priority table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingEntry {
    path: Cow<'static, str>,
    condition: AccessCondition,
}

impl LandingEntry {
    pub fn new(path: impl Into<Cow<'static, str>>, condition: AccessCondition) -> Self {
        Self {
            path: path.into(),
            condition,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn condition(&self) -> &AccessCondition {
        &self.condition
    }
}

/// Next thing the landing page should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandingStep {
    /// Permission fetch still in flight; show a placeholder.
    Loading,
    /// Wait `delay`, then reload the store and ask again.
    RetryAfter(Duration),
    /// Redirect to this path.
    Redirect(String),
    /// Nothing in the table is allowed; show the no-access page.
    NoAccess,
}

#[derive(Debug, Clone)]
pub struct LandingResolver {
    table: Vec<LandingEntry>,
    policy: RetryPolicy,
    attempts: u32,
}

impl LandingResolver {
    pub fn new(table: Vec<LandingEntry>, policy: RetryPolicy) -> Self {
        Self {
            table,
            policy,
            attempts: 0,
        }
    }

    /// Automatic reloads requested so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Decide the next step for the given state.
    ///
    /// A degraded state is walked like a ready one, so an outage lands the
    /// privileged role on its first page and retries everyone else.
    pub fn step(&mut self, state: &PermissionState) -> LandingStep {
        if !state.status.is_terminal() {
            return LandingStep::Loading;
        }

        if state.permissions.is_empty() && !state.is_privileged() && self.attempts < self.policy.max_attempts {
            self.attempts += 1;
            tracing::debug!(attempt = self.attempts, "empty permission set; scheduling reload");
            return LandingStep::RetryAfter(self.policy.delay);
        }

        match self.first_allowed(state) {
            Some(path) => LandingStep::Redirect(path.to_string()),
            None => {
                tracing::info!(role = ?state.role, "no landing route allowed");
                LandingStep::NoAccess
            }
        }
    }

    /// First table path the state satisfies.
    pub fn first_allowed(&self, state: &PermissionState) -> Option<&str> {
        self.table
            .iter()
            .find(|entry| entry.condition.is_satisfied_by(state))
            .map(LandingEntry::path)
    }
}

/// Drive a resolver against a live store until it reaches an outcome.
///
/// Loads the store first if nothing has fetched yet; a load already in flight
/// is awaited instead.
#[cfg(not(target_arch = "wasm32"))]
pub async fn resolve_landing<S: crate::client::PermissionSource>(
    store: &crate::store::PermissionStore<S>,
    resolver: &mut LandingResolver,
) -> LandingStep {
    let mut rx = store.subscribe();

    loop {
        let state = rx.borrow_and_update().clone();

        match resolver.step(&state) {
            LandingStep::Loading if state.status == backoffice_auth::PermissionStatus::Uninitialized => {
                store.load().await;
            }
            LandingStep::Loading => {
                if rx.changed().await.is_err() {
                    return LandingStep::Loading;
                }
            }
            LandingStep::RetryAfter(delay) => {
                tokio::time::sleep(delay).await;
                store.reload().await;
            }
            outcome => return outcome,
        }
    }
}

/// Landing outcome for a fresh session: straight to login without a stored
/// credential, otherwise load the store and resolve.
#[cfg(not(target_arch = "wasm32"))]
pub async fn land_session<S: crate::client::PermissionSource>(
    store: &crate::store::PermissionStore<S>,
    resolver: &mut LandingResolver,
) -> LandingStep {
    if !store.has_credential() {
        tracing::warn!("no auth token stored; skipping permission fetch");
        return LandingStep::Redirect(crate::routes::LOGIN_PATH.to_string());
    }

    store.load().await;
    resolve_landing(store, resolver).await
}
