//! Session store: the single owner of persisted credentials.
//!
//! ARCHITECTURE
//! ============
//! Callers only see typed operations (`get`/`set`/`clear` and the current-user
//! accessors); raw keys never leak. The current user is a derived cache over
//! the `user-*` keys, invalidated on every mutation so it can never disagree
//! with storage. Listeners registered with `subscribe` observe every mutation,
//! which is how the UI keeps its reactive auth state in step.
//!
//! Clones share the same storage, cache, and listeners.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use time::OffsetDateTime;

use crate::record::{
    ACCESS_TOKEN_KEY, CLIENT_KEY, CurrentUser, ORGANIZATION_ID_KEY, ORGANIZATION_KEY, SESSION_KEYS,
    SUBSCRIPTION_EXPIRES_AT_KEY, SessionPatch, SessionRecord, SessionState, UID_KEY, USER_EMAIL_KEY,
    USER_ID_KEY, USER_KEYS, USER_KIND_KEY, USER_NAME_KEY, parse_timestamp,
};
use crate::storage::{KeyValueStorage, StorageError};

type Listener = Box<dyn Fn(&SessionRecord, Option<&CurrentUser>) + Send + Sync>;

#[derive(Clone, Debug, Default)]
enum UserCache {
    #[default]
    Stale,
    Fresh(Option<CurrentUser>),
}

struct Inner<S> {
    storage: S,
    user: Mutex<UserCache>,
    listeners: Mutex<Vec<Listener>>,
}

/// Durable session state over a [`KeyValueStorage`].
pub struct SessionStore<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for SessionStore<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S> fmt::Debug for SessionStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl<S: KeyValueStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                storage,
                user: Mutex::new(UserCache::Stale),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    /// Read the full record. Unreadable storage yields absent fields.
    pub fn get(&self) -> SessionRecord {
        SessionRecord {
            access_token: self.read(ACCESS_TOKEN_KEY),
            client_id: self.read(CLIENT_KEY),
            user_id: self.read(UID_KEY),
            user_kind: self.read(USER_KIND_KEY),
            organization: self.read(ORGANIZATION_KEY),
            organization_id: self.read(ORGANIZATION_ID_KEY),
            subscription_expires_at: self
                .read(SUBSCRIPTION_EXPIRES_AT_KEY)
                .as_deref()
                .and_then(parse_timestamp),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.get().state()
    }

    /// Merge `patch` into storage. Fields absent from the patch are kept.
    ///
    /// Every entry is attempted even if an earlier write fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`StorageError`] encountered.
    pub fn set(&self, patch: SessionPatch) -> Result<(), StorageError> {
        if patch.is_empty() {
            return Ok(());
        }
        let mut first_err = None;
        for (key, value) in patch.entries() {
            if let Err(e) = self.inner.storage.set_item(key, &value) {
                log::warn!("session: write {key} failed: {e}");
                first_err = first_err.or(Some(e));
            } else {
                log::debug!("session: stored {key}");
            }
        }
        self.changed();
        first_err.map_or(Ok(()), Err)
    }

    /// Remove every session and current-user key.
    ///
    /// # Errors
    ///
    /// Returns the first [`StorageError`] encountered.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut first_err = None;
        for key in SESSION_KEYS.iter().chain(USER_KEYS.iter()) {
            if let Err(e) = self.inner.storage.remove_item(key) {
                log::warn!("session: remove {key} failed: {e}");
                first_err = first_err.or(Some(e));
            }
        }
        log::debug!("session: cleared");
        self.changed();
        first_err.map_or(Ok(()), Err)
    }

    /// Cached projection of the signed-in user, re-read from storage after
    /// any mutation. `None` when no `user-*` key is stored.
    pub fn current_user(&self) -> Option<CurrentUser> {
        let mut cache = self.inner.user.lock().unwrap_or_else(PoisonError::into_inner);
        if let UserCache::Fresh(user) = &*cache {
            return user.clone();
        }
        let user = self.load_user();
        *cache = UserCache::Fresh(user.clone());
        user
    }

    /// Replace (or with `None`, remove) the stored current user.
    ///
    /// # Errors
    ///
    /// Returns the first [`StorageError`] encountered.
    pub fn set_current_user(&self, user: Option<&CurrentUser>) -> Result<(), StorageError> {
        let writes: Vec<(&str, Option<&str>)> = match user {
            Some(user) => vec![
                (USER_ID_KEY, Some(user.id.as_str())),
                (USER_NAME_KEY, Some(user.name.as_str())),
                (USER_EMAIL_KEY, Some(user.email.as_str())),
            ],
            None => USER_KEYS.iter().map(|key| (*key, None)).collect(),
        };
        let mut first_err = None;
        for (key, value) in writes {
            let result = match value {
                Some(value) => self.inner.storage.set_item(key, value),
                None => self.inner.storage.remove_item(key),
            };
            if let Err(e) = result {
                log::warn!("session: current user write {key} failed: {e}");
                first_err = first_err.or(Some(e));
            }
        }
        self.changed();
        first_err.map_or(Ok(()), Err)
    }

    /// Clear the session when its stored subscription expiry lies before
    /// `now`. Returns whether anything was cleared.
    ///
    /// Run on rehydration, since the interceptor only sees expiries carried
    /// by responses.
    ///
    /// # Errors
    ///
    /// Returns the first [`StorageError`] from the clear.
    pub fn expire_if_past(&self, now: OffsetDateTime) -> Result<bool, StorageError> {
        let Some(expires_at) = self.get().subscription_expires_at.filter(|at| *at < now) else {
            return Ok(false);
        };
        log::warn!("session: stored subscription expired at {expires_at}, logging out");
        self.clear()?;
        Ok(true)
    }

    /// [`SessionStore::expire_if_past`] against the wall clock.
    ///
    /// # Errors
    ///
    /// Returns the first [`StorageError`] from the clear.
    pub fn expire_stale(&self) -> Result<bool, StorageError> {
        self.expire_if_past(OffsetDateTime::now_utc())
    }

    /// Register a listener called with the fresh record and current user
    /// after each mutation.
    ///
    /// Listeners run synchronously and must not mutate the store or subscribe.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&SessionRecord, Option<&CurrentUser>) + Send + Sync + 'static,
    {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(listener));
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.inner.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                log::debug!("session: read {key} failed: {e}");
                None
            }
        }
    }

    fn load_user(&self) -> Option<CurrentUser> {
        let id = self.read(USER_ID_KEY);
        let name = self.read(USER_NAME_KEY);
        let email = self.read(USER_EMAIL_KEY);
        if id.is_none() && name.is_none() && email.is_none() {
            return None;
        }
        Some(CurrentUser {
            id: id.unwrap_or_default(),
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
        })
    }

    fn changed(&self) {
        *self.inner.user.lock().unwrap_or_else(PoisonError::into_inner) = UserCache::Stale;
        let record = self.get();
        let user = self.current_user();
        let listeners = self.inner.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(&record, user.as_ref());
        }
    }
}
