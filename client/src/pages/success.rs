//! Confirmation shown after a password reset link was requested.

use leptos::prelude::*;

#[component]
pub fn SuccessPage() -> impl IntoView {
    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Check your email"</h1>
                <p class="login-card__subtitle">
                    "If the address is registered, a link to reset your password is on its way."
                </p>
                <a href="/auth/login" class="login-link">"Back to sign in"</a>
            </div>
        </div>
    }
}
