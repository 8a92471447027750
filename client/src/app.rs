//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};
use session::SessionStore;

use crate::components::toast::ToastHost;
use crate::net::api::load_config;
use crate::net::browser::BrowserStorage;
use crate::pages::{
    dashboard::DashboardPage, forgot_password::ForgotPasswordPage, landing::LandingPage, login::LoginPage,
    register::RegisterPage, reset_password::ResetPasswordPage, success::SuccessPage,
};
use crate::state::{auth::AuthState, toast::ToastState, ui::UiState};

/// Root application component.
///
/// Provides the session store, config, and reactive state contexts, and sets
/// up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = load_config();
    let store = SessionStore::new(BrowserStorage);

    // The auth signal is only ever written by this listener.
    let auth = RwSignal::new(AuthState::rehydrate(&store));
    store.subscribe(move |record, user| {
        auth.set(AuthState::new(record.clone(), user.cloned()));
    });

    provide_context(config);
    provide_context(store);
    provide_context(auth);
    provide_context(RwSignal::new(UiState::default()));
    provide_context(RwSignal::new(ToastState::default()));

    view! {
        <Title text="Auth"/>

        <Router>
            <ToastHost/>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=(StaticSegment("auth"), StaticSegment("login")) view=LoginPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("register")) view=RegisterPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("forgot_password")) view=ForgotPasswordPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("reset_password")) view=ResetPasswordPage/>
                <Route path=StaticSegment("landing") view=LandingPage/>
                <Route path=(StaticSegment("pages"), StaticSegment("success")) view=SuccessPage/>
                <Route path=StaticSegment("") view=DashboardPage/>
            </Routes>
        </Router>
    }
}
