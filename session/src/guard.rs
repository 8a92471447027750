//! Session guard for protected views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected views call [`SessionGuard::check_authenticated`] when they mount.
//! The check is advisory: the API re-validates every authenticated request,
//! so a single synchronous read of the store suffices and nothing is retried.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::record::SessionRecord;
use crate::storage::KeyValueStorage;
use crate::store::SessionStore;

/// Default redirect target for unauthenticated visitors.
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";

/// Router collaborator: performs client-side navigation to `path`.
///
/// Navigation is fire-and-forget; implementations must not block.
pub trait Navigator {
    fn navigate(&self, path: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str),
{
    fn navigate(&self, path: &str) {
        self(path);
    }
}

/// True when the record carries a non-empty access token, client id, and user id.
#[must_use]
pub fn is_authenticated(record: &SessionRecord) -> bool {
    record.has_credentials()
}

/// Reads the store and redirects unauthenticated visitors.
pub struct SessionGuard<S, N> {
    store: SessionStore<S>,
    navigator: N,
    login_path: String,
}

impl<S: KeyValueStorage, N: Navigator> SessionGuard<S, N> {
    pub fn new(store: SessionStore<S>, navigator: N) -> Self {
        Self { store, navigator, login_path: DEFAULT_LOGIN_PATH.to_owned() }
    }

    /// Override the default redirect target.
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Return whether the stored session is authenticated; when it is not,
    /// navigate to `redirect_target` (or the login path).
    ///
    /// Safe to call repeatedly. Unavailable storage counts as unauthenticated.
    pub fn check_authenticated(&self, redirect_target: Option<&str>) -> bool {
        if is_authenticated(&self.store.get()) {
            return true;
        }
        let target = redirect_target.unwrap_or(&self.login_path);
        log::debug!("guard: unauthenticated, redirecting to {target}");
        self.navigator.navigate(target);
        false
    }

    /// Inverse check for public views such as the login page: forward an
    /// already-authenticated visitor to `target`. Returns whether it did.
    pub fn redirect_if_authenticated(&self, target: &str) -> bool {
        if !is_authenticated(&self.store.get()) {
            return false;
        }
        log::debug!("guard: already authenticated, redirecting to {target}");
        self.navigator.navigate(target);
        true
    }
}
