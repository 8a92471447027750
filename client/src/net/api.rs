//! Wiring of the browser collaborators into the session API.
//!
//! Configuration is baked at compile time from `API_URL`, `AUTH_LOGIN_PATH`,
//! and `AUTH_LANDING_PATH`; an invalid value falls back to the defaults with
//! a warning rather than failing the mount.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use leptos_router::NavigateOptions;
use session::{ApiConfig, AuthApi, Interceptor, Navigator, SessionStore};

use super::browser::{BrowserStorage, FetchTransport};

pub type BrowserStore = SessionStore<BrowserStorage>;
pub type BrowserApi = AuthApi<FetchTransport, BrowserStorage>;

fn build_time_var(key: &str) -> Option<String> {
    let value = match key {
        "API_URL" => option_env!("API_URL"),
        "AUTH_LOGIN_PATH" => option_env!("AUTH_LOGIN_PATH"),
        "AUTH_LANDING_PATH" => option_env!("AUTH_LANDING_PATH"),
        _ => None,
    };
    value.map(str::to_owned)
}

/// Resolve configuration from `lookup`, falling back to defaults on error.
pub fn config_from<F>(lookup: F) -> ApiConfig
where
    F: Fn(&str) -> Option<String>,
{
    ApiConfig::from_lookup(lookup).unwrap_or_else(|e| {
        log::warn!("config: {e}; using defaults");
        ApiConfig::default()
    })
}

pub fn load_config() -> ApiConfig {
    config_from(build_time_var)
}

/// Adapt a `leptos_router` navigate function to the session [`Navigator`].
pub fn router_navigator<F>(navigate: F) -> impl Navigator + Clone + 'static
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    move |path: &str| navigate(path, NavigateOptions::default())
}

/// Fresh API handle over the shared store. Forced logouts navigate with
/// `navigator`.
pub fn auth_api(config: &ApiConfig, store: BrowserStore, navigator: impl Navigator + 'static) -> BrowserApi {
    let interceptor =
        Interceptor::from_config(FetchTransport::new(config.clone()), store, config).with_navigator(navigator);
    AuthApi::new(interceptor, config.routes.clone())
}
