//! Route guards over the session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical redirect behavior, so both guards
//! delegate to `session::SessionGuard` and re-run whenever the reactive auth
//! state changes (e.g. a forced logout while the page is open).

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use session::SessionGuard;

use crate::net::api::{BrowserStore, router_navigator};
use crate::state::auth::AuthState;

/// Redirect to `login_path` whenever the stored session is unauthenticated.
pub fn install_session_guard<F>(auth: RwSignal<AuthState>, store: BrowserStore, login_path: String, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let guard = SessionGuard::new(store, router_navigator(navigate)).with_login_path(login_path);
    Effect::new(move || {
        auth.track();
        guard.check_authenticated(None);
    });
}

/// Forward an already-authenticated visitor from a public page to `home_path`.
pub fn install_guest_redirect<F>(auth: RwSignal<AuthState>, store: BrowserStore, home_path: String, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let guard = SessionGuard::new(store, router_navigator(navigate));
    Effect::new(move || {
        auth.track();
        guard.redirect_if_authenticated(&home_path);
    });
}
