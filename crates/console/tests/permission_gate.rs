use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::routing::get;
use axum::{Json, Router};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

use backoffice_auth::{PermissionStatus, Role, has};
use backoffice_console::landing::{land_session, resolve_landing};
use backoffice_console::routes::{landing_priority, protected_routes};
use backoffice_console::storage::TOKEN_KEY;
use backoffice_console::{
    ApiClient, ApiError, GuardDecision, LandingResolver, LandingStep, MemoryStorage, PermissionSource,
    PermissionStore, RetryPolicy, RouteGuard, TokenStorage,
};

type Responder = dyn Fn(usize, Option<&str>) -> (StatusCode, Value) + Send + Sync;

#[derive(Clone)]
struct Backend {
    calls: Arc<AtomicUsize>,
    respond: Arc<Responder>,
}

async fn mis_permisos(State(backend): State<Backend>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let n = backend.calls.fetch_add(1, Ordering::SeqCst);
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    let (status, body) = (backend.respond)(n, token);
    (status, Json(body))
}

struct TestServer {
    api_url: String,
    calls: Arc<AtomicUsize>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn<F>(respond: F) -> Self
    where
        F: Fn(usize, Option<&str>) -> (StatusCode, Value) + Send + Sync + 'static,
    {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = Backend {
            calls: calls.clone(),
            respond: Arc::new(respond),
        };
        let app = Router::new()
            .route("/api/permisos/mis-permisos", get(mis_permisos))
            .with_state(backend);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            api_url: format!("http://{}/api", addr),
            calls,
            handle,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(rol: &str) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &json!({ "sub": "17", "rol": rol }),
        &EncodingKey::from_secret(b"backend-only-secret"),
    )
    .expect("failed to encode jwt")
}

fn storage(token: Option<&str>) -> Arc<dyn TokenStorage> {
    match token {
        Some(t) => Arc::new(MemoryStorage::with_token(TOKEN_KEY, t)),
        None => Arc::new(MemoryStorage::new()),
    }
}

fn store_for(server: &TestServer, tokens: Arc<dyn TokenStorage>) -> PermissionStore<ApiClient> {
    let client = ApiClient::new(server.api_url.clone(), TOKEN_KEY, tokens.clone());
    PermissionStore::new(client, tokens, TOKEN_KEY)
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 2,
        delay: Duration::from_millis(5),
    }
}

/// Backend that only answers a known bearer token.
fn gerente_backend(_: usize, token: Option<&str>) -> (StatusCode, Value) {
    match token {
        Some(t) if t == "tok-gerente" => (
            StatusCode::OK,
            json!({ "permisos": ["productos.ver", "dashboard.ver_ventas"], "rol": "GERENTE", "usuario_id": 17 }),
        ),
        _ => (StatusCode::UNAUTHORIZED, json!({ "detail": "Not authenticated" })),
    }
}

#[tokio::test]
async fn client_sends_bearer_and_parses_payload() {
    let server = TestServer::spawn(gerente_backend).await;
    let client = ApiClient::new(format!("{}/", server.api_url), TOKEN_KEY, storage(Some("tok-gerente")));

    let payload = client.fetch_my_permissions().await.unwrap();
    assert_eq!(payload.rol, "GERENTE");
    assert_eq!(payload.usuario_id, 17);
    assert_eq!(payload.permisos, vec!["productos.ver", "dashboard.ver_ventas"]);
    assert_eq!(server.calls(), 1);
}

#[tokio::test]
async fn client_maps_401_and_5xx() {
    let server = TestServer::spawn(|n, _| match n {
        0 => (StatusCode::UNAUTHORIZED, json!({})),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "detail": "db down" })),
    })
    .await;
    let client = ApiClient::new(server.api_url.clone(), TOKEN_KEY, storage(None));

    assert_eq!(client.fetch_my_permissions().await.unwrap_err(), ApiError::Unauthorized);

    let err = client.fetch_my_permissions().await.unwrap_err();
    let ApiError::Api(status, body) = err else {
        panic!("expected Api error");
    };
    assert_eq!(status, 500);
    assert!(body.contains("db down"));
}

#[tokio::test]
async fn client_reports_bad_json_as_parse_error() {
    let server = TestServer::spawn(|_, _| (StatusCode::OK, json!({ "permisos": "nope" }))).await;
    let client = ApiClient::new(server.api_url.clone(), TOKEN_KEY, storage(Some("x")));

    assert!(matches!(client.fetch_my_permissions().await, Err(ApiError::Parse(_))));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let client = ApiClient::new("http://127.0.0.1:1/api", TOKEN_KEY, storage(Some("x")));
    assert!(matches!(client.fetch_my_permissions().await, Err(ApiError::Network(_))));
}

#[tokio::test]
async fn store_loads_and_guards_allow() {
    let server = TestServer::spawn(gerente_backend).await;
    let store = store_for(&server, storage(Some("tok-gerente")));

    assert_eq!(store.load().await, PermissionStatus::Ready);
    let state = store.state();
    assert_eq!(state.role, Some(Role::GERENTE));
    assert!(has(&state, "productos.ver"));

    let guard = RouteGuard::new(backoffice_auth::AccessCondition::permission("productos.ver"));
    assert_eq!(guard.decide(store.has_credential(), &state), GuardDecision::Allow);

    let guard = RouteGuard::new(backoffice_auth::AccessCondition::permission("productos.ver_tienda"));
    assert_eq!(guard.decide(store.has_credential(), &state), GuardDecision::RedirectToRoot);
}

#[tokio::test]
async fn rejected_admin_token_degrades_to_nothing() {
    let token = mint_jwt("ADMIN");
    let server = TestServer::spawn(|_, _| (StatusCode::UNAUTHORIZED, json!({}))).await;
    let store = store_for(&server, storage(Some(token.as_str())));

    let status = store.load().await;
    assert!(status.is_degraded());

    let state = store.state();
    assert_eq!(state.role, Some(Role::ADMIN));
    assert!(state.permissions.is_empty());
    assert!(!has(&state, "productos.ver"));

    // Degraded data is settled: the guard decides on it instead of spinning.
    let guard = RouteGuard::new(backoffice_auth::AccessCondition::permission("productos.ver"));
    assert_eq!(guard.decide(true, &state), GuardDecision::RedirectToRoot);
}

#[tokio::test]
async fn outage_with_superadmin_token_recovers_wildcard() {
    let token = mint_jwt("SUPERADMIN");
    let server = TestServer::spawn(|_, _| (StatusCode::BAD_GATEWAY, json!({}))).await;
    let store = store_for(&server, storage(Some(token.as_str())));

    store.load().await;
    let state = store.state();
    assert!(state.status.is_degraded());
    assert!(state.permissions.has_wildcard());
    assert!(has(&state, "admin.gestionar_pms"));

    for route in protected_routes() {
        let guard = RouteGuard::new(route.condition.clone());
        assert_eq!(guard.decide(store.has_credential(), &state), GuardDecision::Allow, "{}", route.path);
    }

    let mut resolver = LandingResolver::new(landing_priority(), fast_retry());
    let step = resolve_landing(&store, &mut resolver).await;
    assert_eq!(step, LandingStep::Redirect("/productos".to_string()));
    assert_eq!(resolver.attempts(), 0);
    assert_eq!(server.calls(), 1);
}

#[tokio::test]
async fn outage_with_admin_token_ends_on_no_access() {
    let token = mint_jwt("ADMIN");
    let server = TestServer::spawn(|_, _| (StatusCode::SERVICE_UNAVAILABLE, json!({}))).await;
    let store = store_for(&server, storage(Some(token.as_str())));
    store.load().await;

    let mut resolver = LandingResolver::new(landing_priority(), fast_retry());
    let step = resolve_landing(&store, &mut resolver).await;

    assert_eq!(step, LandingStep::NoAccess);
    assert_eq!(resolver.attempts(), 2);
    assert_eq!(server.calls(), 3);
    assert!(store.state().status.is_degraded());
}

#[tokio::test]
async fn landing_retries_until_permissions_arrive() {
    let server = TestServer::spawn(|n, _| {
        let permisos: Vec<&str> = if n < 2 { vec![] } else { vec!["pedidos.ver_preparacion"] };
        (StatusCode::OK, json!({ "permisos": permisos, "rol": "VENTAS", "usuario_id": 3 }))
    })
    .await;
    let store = store_for(&server, storage(Some("tok")));
    store.load().await;

    let mut resolver = LandingResolver::new(landing_priority(), fast_retry());
    let step = resolve_landing(&store, &mut resolver).await;

    assert_eq!(step, LandingStep::Redirect("/preparacion".to_string()));
    assert_eq!(resolver.attempts(), 2);
    assert_eq!(server.calls(), 3);
}

#[tokio::test]
async fn landing_stops_after_two_reloads() {
    let server = TestServer::spawn(|_, _| {
        (StatusCode::OK, json!({ "permisos": [], "rol": "VENTAS", "usuario_id": 3 }))
    })
    .await;
    let store = store_for(&server, storage(Some("tok")));
    store.load().await;

    let mut resolver = LandingResolver::new(landing_priority(), fast_retry());
    let step = resolve_landing(&store, &mut resolver).await;

    assert_eq!(step, LandingStep::NoAccess);
    assert_eq!(resolver.attempts(), 2);
    assert_eq!(server.calls(), 3);
}

#[tokio::test]
async fn landing_waits_for_an_in_flight_load() {
    let server = TestServer::spawn(gerente_backend).await;
    let store = Arc::new(store_for(&server, storage(Some("tok-gerente"))));

    let mut rx = store.subscribe();
    let loader = {
        let store = store.clone();
        tokio::spawn(async move { store.load().await })
    };
    // Resume once the loader has flipped the store to Loading.
    rx.changed().await.unwrap();

    let mut resolver = LandingResolver::new(landing_priority(), fast_retry());
    let step = resolve_landing(&*store, &mut resolver).await;

    assert_eq!(loader.await.unwrap(), PermissionStatus::Ready);
    assert_eq!(step, LandingStep::Redirect("/productos".to_string()));
    assert_eq!(resolver.attempts(), 0);
    assert_eq!(server.calls(), 1);
}

#[tokio::test]
async fn landing_loads_an_untouched_store() {
    let server = TestServer::spawn(gerente_backend).await;
    let store = store_for(&server, storage(Some("tok-gerente")));
    assert_eq!(store.state().status, PermissionStatus::Uninitialized);

    let mut resolver = LandingResolver::new(landing_priority(), fast_retry());
    let step = tokio::time::timeout(Duration::from_secs(5), resolve_landing(&store, &mut resolver))
        .await
        .expect("landing never settled");

    assert_eq!(step, LandingStep::Redirect("/productos".to_string()));
    assert_eq!(server.calls(), 1);
}

#[tokio::test]
async fn session_without_token_goes_to_login_without_fetching() {
    let server = TestServer::spawn(gerente_backend).await;
    let store = store_for(&server, storage(None));

    let mut resolver = LandingResolver::new(landing_priority(), fast_retry());
    let step = land_session(&store, &mut resolver).await;

    assert_eq!(step, LandingStep::Redirect("/login".to_string()));
    assert_eq!(server.calls(), 0);
    assert_eq!(store.state().status, PermissionStatus::Uninitialized);
}

#[tokio::test]
async fn session_with_token_loads_and_lands() {
    let server = TestServer::spawn(gerente_backend).await;
    let store = store_for(&server, storage(Some("tok-gerente")));

    let mut resolver = LandingResolver::new(landing_priority(), fast_retry());
    let step = land_session(&store, &mut resolver).await;

    assert_eq!(step, LandingStep::Redirect("/productos".to_string()));
    assert_eq!(server.calls(), 1);
}
