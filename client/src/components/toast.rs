//! Toast stack rendered above every route.

use leptos::prelude::*;

use crate::state::toast::ToastState;

#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = expect_context::<RwSignal<ToastState>>();

    // Ids below the watermark already have a dismiss timer.
    let scheduled = StoredValue::new(0_u64);
    Effect::new(move || {
        let (fresh, next) = toasts.with(|t| (t.ids_since(scheduled.get_value()), t.next_id()));
        scheduled.set_value(next);
        for id in fresh {
            schedule_dismiss(toasts, id);
        }
    });

    view! {
        <div class="toast-stack" role="status">
            <For
                each=move || toasts.get().toasts
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.severity.css_class()>
                            <strong class="toast__summary">{toast.summary}</strong>
                            <span class="toast__detail">{toast.detail}</span>
                            <button
                                class="toast__close"
                                aria-label="Dismiss"
                                on:click=move |_| toasts.update(|t| t.dismiss(id))
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[cfg(feature = "csr")]
fn schedule_dismiss(toasts: RwSignal<ToastState>, id: u64) {
    leptos::task::spawn_local(async move {
        gloo_timers::future::sleep(crate::state::toast::TOAST_LIFE).await;
        // The host may be gone by now.
        let _ = toasts.try_update(|t| t.dismiss(id));
    });
}

#[cfg(not(feature = "csr"))]
fn schedule_dismiss(_toasts: RwSignal<ToastState>, _id: u64) {}
