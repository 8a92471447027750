//! Collapsible sidebar with the menu and the logout action.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::ApiConfig;

use crate::components::user_profile::UserProfile;
use crate::net::api::{BrowserStore, auth_api, router_navigator};
use crate::state::toast::{Severity, ToastState};
use crate::state::ui::{MenuEntry, UiState};

#[component]
pub fn Sidebar() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let store = expect_context::<BrowserStore>();
    let config = expect_context::<ApiConfig>();
    let navigate = use_navigate();
    let busy = RwSignal::new(false);

    let on_logout = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        let api = auth_api(&config, store.clone(), router_navigator(navigate.clone()));
        let navigate = navigate.clone();
        let login_path = config.login_path.clone();
        leptos::task::spawn_local(async move {
            if let Err(e) = api.sign_out().await {
                log::warn!("logout: {e}");
                toasts.update(|t| t.push_api_error(&e));
            } else {
                toasts.update(|t| {
                    t.push(Severity::Success, "Signed out", "");
                });
            }
            busy.set(false);
            navigate(&login_path, NavigateOptions::default());
        });
    };

    let class = move || {
        if ui.get().sidebar_expanded { "sidebar sidebar--expanded" } else { "sidebar sidebar--collapsed" }
    };

    view! {
        <aside class=class>
            <button class="sidebar__toggle" on:click=move |_| ui.update(UiState::toggle_sidebar)>
                {move || if ui.get().sidebar_expanded { "«" } else { "»" }}
            </button>
            <UserProfile/>
            <nav class="sidebar__menu">
                {MenuEntry::ALL
                    .into_iter()
                    .map(|entry| {
                        let item_class = move || {
                            if ui.get().active_entry == entry {
                                "sidebar__item sidebar__item--active"
                            } else {
                                "sidebar__item"
                            }
                        };
                        view! {
                            <a
                                href=entry.path()
                                class=item_class
                                on:click=move |_| ui.update(|u| u.select(entry))
                            >
                                {entry.label()}
                            </a>
                        }
                    })
                    .collect_view()}
            </nav>
            <button class="sidebar__logout" on:click=on_logout disabled=move || busy.get()>
                "Sign out"
            </button>
        </aside>
    }
}
