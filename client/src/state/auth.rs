//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Provided as `RwSignal<AuthState>` and fed exclusively by a
//! `SessionStore::subscribe` listener installed in `App`, so views re-render
//! on login, refresh, and forced logout without ever writing it themselves.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use session::guard::is_authenticated;
use session::{CurrentUser, KeyValueStorage, SessionRecord, SessionState, SessionStore};

/// Reactive snapshot of the session store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub record: SessionRecord,
    pub user: Option<CurrentUser>,
}

impl AuthState {
    pub fn new(record: SessionRecord, user: Option<CurrentUser>) -> Self {
        Self { record, user }
    }

    pub fn from_store<S: KeyValueStorage>(store: &SessionStore<S>) -> Self {
        Self::new(store.get(), store.current_user())
    }

    /// Startup snapshot. A session whose stored subscription expiry has
    /// passed is cleared first, so a reload never resurrects it.
    pub fn rehydrate<S: KeyValueStorage>(store: &SessionStore<S>) -> Self {
        match store.expire_stale() {
            Ok(true) => log::info!("auth: stored session expired, starting logged out"),
            Ok(false) => {}
            Err(e) => log::warn!("auth: clearing expired session failed: {e}"),
        }
        Self::from_store(store)
    }

    pub fn is_authenticated(&self) -> bool {
        is_authenticated(&self.record)
    }

    pub fn state(&self) -> SessionState {
        self.record.state()
    }

    /// Name shown in the profile badge; `None` hides the badge.
    pub fn display_name(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|u| u.name.trim())
            .filter(|name| !name.is_empty())
    }
}
