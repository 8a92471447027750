//! Login page: email + password sign-in.
//!
//! Local validation failures render inline; API failures become toasts.
//! Visitors that already hold a session are forwarded home.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::ApiConfig;

use crate::net::api::{BrowserStore, auth_api, router_navigator};
use crate::state::auth::AuthState;
use crate::state::toast::ToastState;
use crate::util::form::sign_in_request;
use crate::util::guard::install_guest_redirect;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let store = expect_context::<BrowserStore>();
    let config = expect_context::<ApiConfig>();
    let navigate = use_navigate();

    install_guest_redirect(auth, store.clone(), config.home_path.clone(), navigate.clone());

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let request = match sign_in_request(&email.get(), &password.get()) {
            Ok(request) => request,
            Err(message) => {
                info.set(message);
                return;
            }
        };
        info.set(String::new());
        busy.set(true);

        let api = auth_api(&config, store.clone(), router_navigator(navigate.clone()));
        let navigate = navigate.clone();
        let home = config.home_path.clone();
        leptos::task::spawn_local(async move {
            match api.sign_in(&request).await {
                Ok(_) => navigate(&home, NavigateOptions::default()),
                Err(e) => toasts.update(|t| t.push_api_error(&e)),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Sign in"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign in"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <a href="/auth/forgot_password" class="login-link">"Forgot your password?"</a>
                <a href="/auth/register" class="login-link">"Create an account"</a>
            </div>
        </div>
    }
}
