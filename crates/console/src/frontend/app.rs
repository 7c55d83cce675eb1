//! Leptos application with routing.

use leptos::*;
use leptos_router::*;

use super::context::PermissionsProvider;
use super::guard::{ProtectedRoute, SmartRedirect};
use crate::routes::protected_routes;

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <PermissionsProvider>
            <Router>
                <main>
                    <Routes>
                        <Route path="/" view=SmartRedirect/>
                        <Route path="/login" view=LoginPage/>
                        <Route path="/productos" view=|| guarded("/productos")/>
                        <Route path="/tienda" view=|| guarded("/tienda")/>
                        <Route path="/calculos" view=|| guarded("/calculos")/>
                        <Route path="/preparacion" view=|| guarded("/preparacion")/>
                        <Route path="/etiquetas" view=|| guarded("/etiquetas")/>
                        <Route path="/dashboard-ventas" view=|| guarded("/dashboard-ventas")/>
                        <Route path="/alertas" view=|| guarded("/alertas")/>
                        <Route path="/notificaciones" view=|| guarded("/notificaciones")/>
                        <Route path="/admin/pms" view=|| guarded("/admin/pms")/>
                        <Route path="/admin/permisos" view=PermissionsAdmin/>
                        <Route path="/admin/usuarios" view=|| guarded("/admin/usuarios")/>
                        <Route path="/*any" view=NotFound/>
                    </Routes>
                </main>
            </Router>
        </PermissionsProvider>
    }
}

/// Wrap the page registered for `path` in its guard.
fn guarded(path: &'static str) -> View {
    match protected_routes().into_iter().find(|r| r.path == path) {
        Some(route) => {
            let title = route.title;
            view! {
                <ProtectedRoute condition=route.condition>
                    <Page title=title/>
                </ProtectedRoute>
            }
            .into_view()
        }
        None => view! { <NotFound/> }.into_view(),
    }
}

/// Permission editing falls back to an inline notice instead of bouncing to `/`.
#[component]
fn PermissionsAdmin() -> impl IntoView {
    let Some(route) = protected_routes().into_iter().find(|r| r.path == "/admin/permisos") else {
        return view! { <NotFound/> }.into_view();
    };

    view! {
        <ProtectedRoute
            condition=route.condition
            fallback=|| view! { <p class="notice">"Necesitás permisos de edición para gestionar permisos."</p> }
        >
            <Page title="Permisos"/>
        </ProtectedRoute>
    }
    .into_view()
}

#[component]
fn Page(title: &'static str) -> impl IntoView {
    view! {
        <section class="page">
            <h1>{title}</h1>
        </section>
    }
}

#[component]
fn LoginPage() -> impl IntoView {
    view! {
        <section class="login">
            <h1>"Iniciar sesión"</h1>
        </section>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <section class="not-found">
            <h1>"Página no encontrada"</h1>
            <A href="/">"Volver al inicio"</A>
        </section>
    }
}
