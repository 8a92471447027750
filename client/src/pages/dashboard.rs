//! Protected home page.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. The session guard runs on mount
//! and again whenever the auth signal changes, so a forced logout elsewhere
//! in the app also bounces this page to the login route.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use session::ApiConfig;

use crate::components::sidebar::Sidebar;
use crate::net::api::BrowserStore;
use crate::state::auth::AuthState;
use crate::util::guard::install_session_guard;

/// Greets the signed-in user inside the app layout.
/// Redirects to the login path if the user is not authenticated.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let store = expect_context::<BrowserStore>();
    let config = expect_context::<ApiConfig>();

    install_session_guard(auth, store, config.login_path.clone(), use_navigate());

    let greeting = move || {
        auth.get()
            .display_name()
            .map_or_else(|| "Welcome".to_owned(), |name| format!("Welcome, {name}"))
    };
    let organization = move || auth.get().record.organization;

    view! {
        <div class="layout">
            <Sidebar/>
            <main class="layout__content">
                <h1>{greeting}</h1>
                {move || organization().map(|org| view! { <p class="layout__organization">{org}</p> })}
            </main>
        </div>
    }
}
