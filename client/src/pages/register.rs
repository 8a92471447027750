//! Registration page.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::ApiConfig;

use crate::net::api::{BrowserStore, auth_api, router_navigator};
use crate::state::auth::AuthState;
use crate::state::toast::{Severity, ToastState};
use crate::util::form::register_request;
use crate::util::guard::install_guest_redirect;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let store = expect_context::<BrowserStore>();
    let config = expect_context::<ApiConfig>();
    let navigate = use_navigate();

    install_guest_redirect(auth, store.clone(), config.home_path.clone(), navigate.clone());

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirmation = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let request = match register_request(&name.get(), &email.get(), &password.get(), &confirmation.get()) {
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
            match api.register(&request).await {
                Ok(_) => {
                    toasts.update(|t| {
                        t.push(Severity::Success, "Welcome", request.name.clone());
                    });
                    navigate(&home, NavigateOptions::default());
                }
                Err(e) => toasts.update(|t| t.push_api_error(&e)),
            }
            busy.set(false);
        });
    };

    let field = move |kind: &'static str, placeholder: &'static str, value: RwSignal<String>| {
        view! {
            <input
                class="login-input"
                type=kind
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Create account"</h1>
                <form class="login-form" on:submit=on_submit>
                    {field("text", "Name", name)}
                    {field("email", "you@example.com", email)}
                    {field("password", "Password", password)}
                    {field("password", "Confirm password", confirmation)}
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Register"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <a href="/auth/login" class="login-link">"Already registered? Sign in"</a>
            </div>
        </div>
    }
}
