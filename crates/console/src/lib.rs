//! `backoffice-console`
//!
//! **Responsibility:** the client side of the back-office permission gate.
//!
//! This crate provides:
//! - A session-scoped permission store fed by the backend
//! - Route guards and landing-page selection over that store
//! - The route tables the console is built from
//! - A Leptos frontend (wasm32) wiring all of the above into the router
//!
//! Policy itself lives in `backoffice-auth`; this crate only adds I/O.

pub mod client;
pub mod config;
pub mod guard;
pub mod landing;
pub mod routes;
pub mod storage;
pub mod store;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use client::{ApiClient, ApiError, PermissionSource};
pub use config::{ConfigError, ConsoleConfig};
pub use guard::{GuardDecision, RouteGuard};
pub use landing::{LandingEntry, LandingResolver, LandingStep, RetryPolicy};
pub use storage::{MemoryStorage, TokenStorage};
pub use store::PermissionStore;
pub use types::MyPermissions;
