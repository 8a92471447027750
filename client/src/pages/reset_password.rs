//! Reset-password page, reached from the emailed link.
//!
//! The token arrives as the `reset_password_token` query parameter. A
//! missing token is reported inline on submit rather than on load, so the
//! page still renders for visitors who typed the URL by hand.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};
use session::ApiConfig;

use crate::net::api::{BrowserStore, auth_api, router_navigator};
use crate::state::toast::{Severity, ToastState};
use crate::util::form::{RESET_TOKEN_PARAM, reset_password_request};

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let toasts = expect_context::<RwSignal<ToastState>>();
    let store = expect_context::<BrowserStore>();
    let config = expect_context::<ApiConfig>();
    let navigate = use_navigate();
    let query = use_query_map();

    let password = RwSignal::new(String::new());
    let confirmation = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let token = query.get().get(RESET_TOKEN_PARAM);
        let request = match reset_password_request(token.as_deref(), &password.get(), &confirmation.get()) {
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
        let login = config.login_path.clone();
        leptos::task::spawn_local(async move {
            match api.reset_password(&request).await {
                Ok(()) => {
                    toasts.update(|t| {
                        t.push(Severity::Success, "Password updated", "Sign in with your new password.");
                    });
                    navigate(&login, NavigateOptions::default());
                }
                Err(e) => toasts.update(|t| t.push_api_error(&e)),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Choose a new password"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="password"
                        placeholder="New password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Confirm new password"
                        prop:value=move || confirmation.get()
                        on:input=move |ev| confirmation.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Update password"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
