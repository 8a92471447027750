//! Badge with the signed-in user's name.

use leptos::prelude::*;

use crate::state::auth::AuthState;

/// Renders nothing until the current user has a name.
#[component]
pub fn UserProfile() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();

    move || {
        let state = auth.get();
        let name = state.display_name()?.to_owned();
        let email = state.user.as_ref().map(|u| u.email.clone()).unwrap_or_default();
        let initial = name.chars().next().map(|c| c.to_uppercase().to_string()).unwrap_or_default();
        Some(view! {
            <div class="user-profile">
                <span class="user-profile__avatar">{initial}</span>
                <div class="user-profile__text">
                    <span class="user-profile__name">{name}</span>
                    <span class="user-profile__email">{email}</span>
                </div>
            </div>
        })
    }
}
