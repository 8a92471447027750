//! # client
//!
//! Leptos + WASM browser shell for the authentication flows: login,
//! registration, password recovery, and a protected home behind the session
//! guard. Session semantics live in the `session` crate; this crate supplies
//! the browser collaborators (`localStorage`, `fetch`, the router) and the
//! views.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install browser logging and mount [`app::App`].
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
