//! Public landing page; also the destination of forced logouts.

use leptos::prelude::*;

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="landing-page">
            <h1>"Welcome"</h1>
            <p>"Sign in to continue, or create an account."</p>
            <div class="landing-page__actions">
                <a href="/auth/login" class="login-button">"Sign in"</a>
                <a href="/auth/register" class="login-button login-button--secondary">"Register"</a>
            </div>
        </div>
    }
}
