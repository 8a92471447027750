use std::sync::atomic::{AtomicUsize, Ordering};

use time::macros::datetime;

use super::*;
use crate::storage::MemoryStorage;

fn store() -> SessionStore<MemoryStorage> {
    SessionStore::new(MemoryStorage::new())
}

/// Storage whose writes always fail and whose reads report unavailability.
struct BrokenStorage;

impl KeyValueStorage for BrokenStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set_item(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Write { key: key.to_owned(), message: "quota".to_owned() })
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

// =============================================================
// get / set / clear
// =============================================================

#[test]
fn fresh_store_is_logged_out() {
    let store = store();
    assert!(store.get().is_empty());
    assert_eq!(store.state(), SessionState::LoggedOut);
}

#[test]
fn set_merges_instead_of_overwriting() {
    let store = store();
    store
        .set(SessionPatch { access_token: Some("a".to_owned()), ..SessionPatch::default() })
        .unwrap();
    store
        .set(SessionPatch { client_id: Some("b".to_owned()), ..SessionPatch::default() })
        .unwrap();

    assert_eq!(
        store.get(),
        SessionRecord {
            access_token: Some("a".to_owned()),
            client_id: Some("b".to_owned()),
            ..SessionRecord::default()
        }
    );
}

#[test]
fn set_last_writer_wins_per_field() {
    let store = store();
    store.set(SessionPatch::credentials("t1", "c1", "u1")).unwrap();
    store.set(SessionPatch::credentials("t2", "c1", "u1")).unwrap();
    assert_eq!(store.get().access_token.as_deref(), Some("t2"));
}

#[test]
fn set_persists_expiry_round_trip() {
    let store = store();
    let at = datetime!(2031-02-03 04:05:06 UTC);
    store
        .set(SessionPatch { subscription_expires_at: Some(at), ..SessionPatch::default() })
        .unwrap();
    assert_eq!(store.get().subscription_expires_at, Some(at));
}

#[test]
fn set_is_visible_through_clones() {
    let a = store();
    let b = a.clone();
    a.set(SessionPatch::credentials("t", "c", "u")).unwrap();
    assert_eq!(b.state(), SessionState::LoggedIn);
}

#[test]
fn clear_removes_every_field() {
    let store = store();
    store.set(SessionPatch::credentials("t", "c", "u")).unwrap();
    store
        .set_current_user(Some(&CurrentUser {
            id: "1".to_owned(),
            name: "Ana".to_owned(),
            email: "ana@example.com".to_owned(),
        }))
        .unwrap();

    store.clear().unwrap();

    assert!(store.get().is_empty());
    assert!(store.current_user().is_none());
    assert!(store.storage().is_empty());
}

#[test]
fn clear_twice_is_idempotent() {
    let store = store();
    store.set(SessionPatch::credentials("t", "c", "u")).unwrap();
    store.clear().unwrap();
    let once = store.storage().snapshot();
    store.clear().unwrap();
    assert_eq!(store.storage().snapshot(), once);
    assert!(store.get().is_empty());
}

#[test]
fn clear_keeps_unrelated_keys() {
    let store = store();
    store.storage().set_item("theme", "dark").unwrap();
    store.clear().unwrap();
    assert_eq!(store.storage().get_item("theme"), Ok(Some("dark".to_owned())));
}

#[test]
fn unparseable_stored_expiry_reads_as_absent() {
    let store = store();
    store.storage().set_item("subscription-expires-at", "soon").unwrap();
    assert_eq!(store.get().subscription_expires_at, None);
}

// =============================================================
// Unavailable storage
// =============================================================

#[test]
fn unavailable_storage_reads_as_logged_out() {
    let store = SessionStore::new(BrokenStorage);
    assert!(store.get().is_empty());
    assert!(store.current_user().is_none());
}

#[test]
fn failed_write_reports_first_error() {
    let store = SessionStore::new(BrokenStorage);
    let err = store.set(SessionPatch::credentials("t", "c", "u")).unwrap_err();
    assert_eq!(err, StorageError::Write { key: "access-token".to_owned(), message: "quota".to_owned() });
}

#[test]
fn failed_clear_reports_error() {
    let store = SessionStore::new(BrokenStorage);
    assert_eq!(store.clear(), Err(StorageError::Unavailable));
}

#[test]
fn failed_current_user_write_reports_first_error() {
    let store = SessionStore::new(BrokenStorage);
    let user = CurrentUser { id: "7".to_owned(), name: "Bia".to_owned(), email: "bia@example.com".to_owned() };

    let err = store.set_current_user(Some(&user)).unwrap_err();

    assert_eq!(err, StorageError::Write { key: "user-id".to_owned(), message: "quota".to_owned() });
    assert_eq!(store.set_current_user(None), Err(StorageError::Unavailable));
}

// =============================================================
// Current user
// =============================================================

#[test]
fn current_user_absent_by_default() {
    assert!(store().current_user().is_none());
}

#[test]
fn set_current_user_then_read() {
    let store = store();
    let user = CurrentUser { id: "7".to_owned(), name: "Bia".to_owned(), email: "bia@example.com".to_owned() };
    store.set_current_user(Some(&user)).unwrap();
    assert_eq!(store.current_user(), Some(user));
}

#[test]
fn current_user_cache_tracks_external_rehydration() {
    let storage = MemoryStorage::new();
    storage.set_item("user-name", "Caio").unwrap();
    let store = SessionStore::new(storage);

    let user = store.current_user().unwrap();
    assert_eq!(user.name, "Caio");
    assert_eq!(user.id, "");
}

#[test]
fn current_user_cache_invalidated_by_clear() {
    let store = store();
    store
        .set_current_user(Some(&CurrentUser { id: "1".to_owned(), ..CurrentUser::default() }))
        .unwrap();
    assert!(store.current_user().is_some());
    store.clear().unwrap();
    assert!(store.current_user().is_none());
}

#[test]
fn set_current_user_none_removes_user_keys_only() {
    let store = store();
    store.set(SessionPatch::credentials("t", "c", "u")).unwrap();
    store
        .set_current_user(Some(&CurrentUser { id: "1".to_owned(), ..CurrentUser::default() }))
        .unwrap();
    store.set_current_user(None).unwrap();
    assert!(store.current_user().is_none());
    assert_eq!(store.state(), SessionState::LoggedIn);
}

// =============================================================
// Stored subscription expiry
// =============================================================

fn store_expiring_at(at: OffsetDateTime) -> SessionStore<MemoryStorage> {
    let store = store();
    store.set(SessionPatch::credentials("t", "c", "u")).unwrap();
    store
        .set(SessionPatch { subscription_expires_at: Some(at), ..SessionPatch::default() })
        .unwrap();
    store
        .set_current_user(Some(&CurrentUser { id: "u".to_owned(), name: "Ana".to_owned(), ..CurrentUser::default() }))
        .unwrap();
    store
}

#[test]
fn past_stored_expiry_clears_on_rehydration() {
    let store = store_expiring_at(datetime!(2000-01-01 0:00 UTC));
    let reopened = SessionStore::new(store.storage().clone());
    assert_eq!(reopened.state(), SessionState::LoggedIn);

    assert_eq!(reopened.expire_if_past(datetime!(2026-10-17 12:00 UTC)), Ok(true));

    assert!(reopened.get().is_empty());
    assert!(reopened.current_user().is_none());
    assert_eq!(reopened.state(), SessionState::LoggedOut);
}

#[test]
fn future_stored_expiry_keeps_session() {
    let store = store_expiring_at(datetime!(2031-01-01 0:00 UTC));
    assert_eq!(store.expire_if_past(datetime!(2026-10-17 12:00 UTC)), Ok(false));
    assert_eq!(store.state(), SessionState::LoggedIn);
    assert!(store.current_user().is_some());
}

#[test]
fn missing_stored_expiry_never_expires() {
    let store = store();
    store.set(SessionPatch::credentials("t", "c", "u")).unwrap();
    assert_eq!(store.expire_if_past(datetime!(2099-01-01 0:00 UTC)), Ok(false));
    assert_eq!(store.state(), SessionState::LoggedIn);
}

// =============================================================
// Subscriptions
// =============================================================

#[test]
fn listeners_observe_each_mutation() {
    let store = store();
    let calls = Arc::new(AtomicUsize::new(0));
    let last_state = Arc::new(Mutex::new(SessionState::LoggedOut));
    {
        let calls = Arc::clone(&calls);
        let last_state = Arc::clone(&last_state);
        store.subscribe(move |record, _user| {
            calls.fetch_add(1, Ordering::SeqCst);
            *last_state.lock().unwrap() = record.state();
        });
    }

    store.set(SessionPatch::credentials("t", "c", "u")).unwrap();
    assert_eq!(*last_state.lock().unwrap(), SessionState::LoggedIn);

    store.clear().unwrap();
    assert_eq!(*last_state.lock().unwrap(), SessionState::LoggedOut);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn empty_patch_does_not_notify() {
    let store = store();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    store.subscribe(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    store.set(SessionPatch::default()).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn listeners_receive_current_user_without_holding_the_store() {
    let store = store();
    let seen = Arc::new(Mutex::new(None));
    {
        let seen = Arc::clone(&seen);
        store.subscribe(move |_, user| {
            *seen.lock().unwrap() = user.map(|u| u.name.clone());
        });
    }

    store
        .set_current_user(Some(&CurrentUser { id: "1".to_owned(), name: "Caio".to_owned(), ..CurrentUser::default() }))
        .unwrap();
    assert_eq!(seen.lock().unwrap().as_deref(), Some("Caio"));

    store.clear().unwrap();
    assert_eq!(*seen.lock().unwrap(), None);
    assert_eq!(Arc::strong_count(&store.inner), 1);
}
