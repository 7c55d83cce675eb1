//! Session permission context.
//!
//! One store per page load, provided to the whole tree. The store's watch
//! channel is mirrored into a signal so components re-render on every status
//! transition.

use std::rc::Rc;
use std::sync::Arc;

use leptos::*;

use backoffice_auth::{PermissionState, has, has_all, has_any};

use crate::client::ApiClient;
use crate::config::ConsoleConfig;
use crate::storage::{BrowserStorage, TokenStorage};
use crate::store::PermissionStore;

#[derive(Clone)]
pub struct Permissions {
    store: Rc<PermissionStore<ApiClient>>,
    state: RwSignal<PermissionState>,
    config: Rc<ConsoleConfig>,
}

impl Permissions {
    /// Current state (tracked).
    pub fn state(&self) -> PermissionState {
        self.state.get()
    }

    pub fn has(&self, code: &str) -> bool {
        self.state.with(|s| has(s, code))
    }

    pub fn has_any(&self, codes: &[&str]) -> bool {
        self.state.with(|s| has_any(s, codes))
    }

    pub fn has_all(&self, codes: &[&str]) -> bool {
        self.state.with(|s| has_all(s, codes))
    }

    pub fn has_credential(&self) -> bool {
        self.store.has_credential()
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn reload(&self) {
        let store = self.store.clone();
        spawn_local(async move {
            store.reload().await;
        });
    }

    pub fn logout(&self) {
        self.store.clear();
    }
}

#[component]
pub fn PermissionsProvider(children: Children) -> impl IntoView {
    let config = ConsoleConfig::default();
    let tokens: Arc<dyn TokenStorage> = Arc::new(BrowserStorage);
    let client = ApiClient::new(config.api_url.clone(), config.token_key.clone(), tokens.clone());
    let store = Rc::new(PermissionStore::new(client, tokens, config.token_key.clone()));
    let state = create_rw_signal(store.state());

    let mut rx = store.subscribe();
    spawn_local(async move {
        while rx.changed().await.is_ok() {
            let next = rx.borrow_and_update().clone();
            state.set(next);
        }
    });

    if store.has_credential() {
        let store = store.clone();
        spawn_local(async move {
            store.load().await;
        });
    }

    provide_context(Permissions {
        store,
        state,
        config: Rc::new(config),
    });

    children()
}

pub fn use_permissions() -> Permissions {
    expect_context::<Permissions>()
}
