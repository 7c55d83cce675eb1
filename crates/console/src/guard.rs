//! Route guard decision table.
//!
//! Evaluated fresh on every render; only the underlying state is cached.

use backoffice_auth::{AccessCondition, PermissionState, explain};

/// What a protected route should do right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// No credential at all: go to the login page.
    RedirectToLogin,
    /// Permission fetch still in flight: render nothing / a placeholder.
    Pending,
    /// Render the protected children.
    Allow,
    /// Denied; render the caller-supplied fallback.
    Fallback,
    /// Denied without a fallback: go to the app root.
    RedirectToRoot,
}

/// A protected route's requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    condition: AccessCondition,
    has_fallback: bool,
}

impl RouteGuard {
    pub fn new(condition: AccessCondition) -> Self {
        Self {
            condition,
            has_fallback: false,
        }
    }

    /// Render fallback content on denial instead of redirecting to root.
    pub fn with_fallback(mut self) -> Self {
        self.has_fallback = true;
        self
    }

    pub fn condition(&self) -> &AccessCondition {
        &self.condition
    }

    /// Decide for the given credential presence and permission state.
    ///
    /// Order matters: credential, then readiness, then the condition. A
    /// degraded (`Failed`) state is settled and gets evaluated like `Ready`.
    pub fn decide(&self, has_credential: bool, state: &PermissionState) -> GuardDecision {
        if !has_credential {
            return GuardDecision::RedirectToLogin;
        }

        if !state.status.is_terminal() {
            return GuardDecision::Pending;
        }

        if self.condition.is_satisfied_by(state) {
            return GuardDecision::Allow;
        }

        if tracing::enabled!(tracing::Level::DEBUG) {
            let why = explain(state, &self.condition);
            tracing::debug!(reason = %why.reason, missing = ?why.missing, "route denied");
        }

        if self.has_fallback {
            GuardDecision::Fallback
        } else {
            GuardDecision::RedirectToRoot
        }
    }
}
