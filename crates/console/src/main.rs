//! Diagnostic entry point: loads the permissions of the user behind
//! `BACKOFFICE_AUTH_TOKEN` and prints where the console would send them.
//!
//! Logs are JSON by default; pass `--pretty` for plain text on stderr.

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::sync::Arc;

    use anyhow::Context;
    use backoffice_auth::explain;
    use backoffice_console::routes::{landing_priority, protected_routes};
    use backoffice_console::{
        ApiClient, ConsoleConfig, GuardDecision, LandingResolver, LandingStep, MemoryStorage, PermissionStore,
        RouteGuard, TokenStorage,
    };

    if std::env::args().skip(1).any(|arg| arg == "--pretty") {
        backoffice_observability::init_pretty();
    } else {
        backoffice_observability::init();
    }

    let config = ConsoleConfig::from_env().context("invalid BACKOFFICE_* configuration")?;

    let storage = Arc::new(MemoryStorage::new());
    match std::env::var("BACKOFFICE_AUTH_TOKEN") {
        Ok(token) => storage.set(&config.token_key, &token),
        Err(_) => tracing::warn!("BACKOFFICE_AUTH_TOKEN not set; every route will redirect to login"),
    }

    let tokens: Arc<dyn TokenStorage> = storage;
    let client = ApiClient::new(config.api_url.clone(), config.token_key.clone(), tokens.clone());
    let store = PermissionStore::new(client, tokens, config.token_key.clone());

    let mut resolver = LandingResolver::new(landing_priority(), config.landing_retry);
    tracing::info!(api_url = %config.api_url, "resolving landing page");
    let landing = backoffice_console::landing::land_session(&store, &mut resolver).await;

    let state = store.state();
    let routes: Vec<serde_json::Value> = protected_routes()
        .into_iter()
        .map(|route| {
            let decision = match RouteGuard::new(route.condition.clone()).decide(store.has_credential(), &state) {
                GuardDecision::RedirectToLogin => "redirect_login",
                GuardDecision::Pending => "pending",
                GuardDecision::Allow => "allow",
                GuardDecision::Fallback => "fallback",
                GuardDecision::RedirectToRoot => "redirect_root",
            };
            let explanation = explain(&state, &route.condition);
            serde_json::json!({
                "path": route.path,
                "title": route.title,
                "decision": decision,
                "explanation": explanation,
            })
        })
        .collect();

    let landing = match landing {
        LandingStep::Redirect(path) => serde_json::json!({ "redirect": path }),
        LandingStep::NoAccess => serde_json::json!("no_access"),
        LandingStep::Loading | LandingStep::RetryAfter(_) => serde_json::json!("loading"),
    };

    let report = serde_json::json!({
        "state": state,
        "landing": landing,
        "landing_attempts": resolver.attempts(),
        "routes": routes,
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
