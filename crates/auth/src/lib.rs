//! `backoffice-auth` — pure permission-gate policy for the back-office console.
//!
//! This crate is intentionally decoupled from HTTP, storage and rendering.
//! It answers "may this session see X?" and nothing else.

pub mod claims;
pub mod condition;
pub mod explain;
pub mod permissions;
pub mod principal;
pub mod query;
pub mod roles;
pub mod state;

pub use claims::{ClaimDecodeError, RecoveredState, decode_role_claim, recover_state};
pub use condition::AccessCondition;
pub use explain::{Explanation, explain};
pub use permissions::{Permission, PermissionSet};
pub use principal::UserId;
pub use query::{has, has_all, has_any};
pub use roles::Role;
pub use state::{PermissionState, PermissionStatus};
