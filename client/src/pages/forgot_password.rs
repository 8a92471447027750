//! Forgot-password page: request a reset link by email.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::ApiConfig;

use crate::net::api::{BrowserStore, auth_api, router_navigator};
use crate::net::browser::current_origin;
use crate::state::toast::ToastState;
use crate::util::form::forgot_password_request;

pub const SUCCESS_PATH: &str = "/pages/success";

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let toasts = expect_context::<RwSignal<ToastState>>();
    let store = expect_context::<BrowserStore>();
    let config = expect_context::<ApiConfig>();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let request = match forgot_password_request(&email.get(), &current_origin()) {
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
        leptos::task::spawn_local(async move {
            match api.forgot_password(&request).await {
                Ok(()) => navigate(SUCCESS_PATH, NavigateOptions::default()),
                Err(e) => toasts.update(|t| t.push_api_error(&e)),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Forgot password"</h1>
                <p class="login-card__subtitle">"We will email you a link to choose a new password."</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Send link"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <a href="/auth/login" class="login-link">"Back to sign in"</a>
            </div>
        </div>
    }
}
