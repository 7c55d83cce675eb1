//! `ProtectedRoute` and `SmartRedirect` components.

use leptos::*;
use leptos_router::Redirect;

use backoffice_auth::AccessCondition;

use super::context::use_permissions;
use crate::guard::{GuardDecision, RouteGuard};
use crate::landing::{LandingResolver, LandingStep};
use crate::routes::{LOGIN_PATH, ROOT_PATH, landing_priority};

#[component]
fn Spinner() -> impl IntoView {
    view! { <div class="loading-spinner" aria-busy="true"></div> }
}

/// Renders `children` only when `condition` holds for the session.
#[component]
pub fn ProtectedRoute(
    #[prop(into)] condition: AccessCondition,
    #[prop(optional, into)] fallback: Option<ViewFn>,
    children: ChildrenFn,
) -> impl IntoView {
    let permissions = use_permissions();
    let guard = match fallback {
        Some(_) => RouteGuard::new(condition).with_fallback(),
        None => RouteGuard::new(condition),
    };

    move || {
        let state = permissions.state();
        match guard.decide(permissions.has_credential(), &state) {
            GuardDecision::RedirectToLogin => view! { <Redirect path=LOGIN_PATH/> }.into_view(),
            GuardDecision::Pending => view! { <Spinner/> }.into_view(),
            GuardDecision::Allow => children().into_view(),
            GuardDecision::Fallback => fallback.as_ref().map(ViewFn::run).into_view(),
            GuardDecision::RedirectToRoot => view! { <Redirect path=ROOT_PATH/> }.into_view(),
        }
    }
}

/// Landing page at `/`: sends the user to the first page they may see.
#[component]
pub fn SmartRedirect() -> impl IntoView {
    let permissions = use_permissions();
    let resolver = store_value(LandingResolver::new(
        landing_priority(),
        permissions.config().landing_retry,
    ));
    let step = create_rw_signal(LandingStep::Loading);
    let timer = store_value(None::<TimeoutHandle>);

    {
        let permissions = permissions.clone();
        create_effect(move |_| {
            let state = permissions.state();
            let next = resolver
                .try_update_value(|r| r.step(&state))
                .unwrap_or(LandingStep::Loading);

            if let LandingStep::RetryAfter(delay) = next {
                let permissions = permissions.clone();
                match set_timeout_with_handle(move || permissions.reload(), delay) {
                    Ok(handle) => timer.set_value(Some(handle)),
                    Err(e) => tracing::warn!("failed to arm landing retry: {e:?}"),
                }
                step.set(LandingStep::Loading);
            } else {
                step.set(next);
            }
        });
    }

    on_cleanup(move || {
        if let Some(handle) = timer.get_value() {
            handle.clear();
        }
    });

    move || {
        if !permissions.has_credential() {
            return view! { <Redirect path=LOGIN_PATH/> }.into_view();
        }
        match step.get() {
            LandingStep::Redirect(path) => view! { <Redirect path=path/> }.into_view(),
            LandingStep::NoAccess => view! {
                <div class="no-access">
                    <h2>"Sin acceso"</h2>
                    <p>"Lo sentimos, tu usuario no tiene acceso a ninguna sección. Contactá a un administrador."</p>
                </div>
            }
            .into_view(),
            LandingStep::Loading | LandingStep::RetryAfter(_) => view! { <Spinner/> }.into_view(),
        }
    }
}
