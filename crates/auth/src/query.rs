//! Permission predicates.
//!
//! - No IO
//! - No panics
//! - Privileged role short-circuits to `true`
//!
//! Every authorization decision in the console is built from these three.

use crate::PermissionState;

/// True iff `code` is granted.
pub fn has(state: &PermissionState, code: &str) -> bool {
    state.is_privileged() || state.permissions.contains(code)
}

/// True iff at least one of `codes` is granted (false for an empty list).
pub fn has_any<S: AsRef<str>>(state: &PermissionState, codes: &[S]) -> bool {
    state.is_privileged() || codes.iter().any(|c| state.permissions.contains(c.as_ref()))
}

/// True iff every one of `codes` is granted (true for an empty list).
pub fn has_all<S: AsRef<str>>(state: &PermissionState, codes: &[S]) -> bool {
    state.is_privileged() || codes.iter().all(|c| state.permissions.contains(c.as_ref()))
}
