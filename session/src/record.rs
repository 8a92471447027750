//! Session record, partial updates, and the current-user projection.
//!
//! DESIGN
//! ======
//! The set of persisted keys is closed: every key the store may touch is a
//! constant below. Keys double as the HTTP header names the API uses to
//! hand out and refresh credentials.

#[cfg(test)]
#[path = "record_test.rs"]
mod record_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

pub const ACCESS_TOKEN_KEY: &str = "access-token";
pub const CLIENT_KEY: &str = "client";
pub const UID_KEY: &str = "uid";
pub const USER_KIND_KEY: &str = "user-kind";
pub const ORGANIZATION_KEY: &str = "organization";
pub const ORGANIZATION_ID_KEY: &str = "organization-id";
pub const SUBSCRIPTION_EXPIRES_AT_KEY: &str = "subscription-expires-at";

pub const USER_ID_KEY: &str = "user-id";
pub const USER_NAME_KEY: &str = "user-name";
pub const USER_EMAIL_KEY: &str = "user-email";

/// Credential keys, also recognized as response headers.
pub const SESSION_KEYS: [&str; 7] = [
    ACCESS_TOKEN_KEY,
    CLIENT_KEY,
    UID_KEY,
    USER_KIND_KEY,
    ORGANIZATION_KEY,
    ORGANIZATION_ID_KEY,
    SUBSCRIPTION_EXPIRES_AT_KEY,
];

/// Keys holding the current-user projection.
pub const USER_KEYS: [&str; 3] = [USER_ID_KEY, USER_NAME_KEY, USER_EMAIL_KEY];

/// Coarse session lifecycle state derived from a [`SessionRecord`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn,
}

/// Durable credential and identity fields for the signed-in user.
///
/// Every field is optional. A record missing any of the access token,
/// client id, or user id is treated as logged out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    pub access_token: Option<String>,
    pub client_id: Option<String>,
    pub user_id: Option<String>,
    pub user_kind: Option<String>,
    pub organization: Option<String>,
    pub organization_id: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub subscription_expires_at: Option<OffsetDateTime>,
}

impl SessionRecord {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when access token, client id, and user id are all non-empty.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        [&self.access_token, &self.client_id, &self.user_id]
            .iter()
            .all(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.has_credentials() { SessionState::LoggedIn } else { SessionState::LoggedOut }
    }

    /// Whether the stored subscription expiry lies strictly before `now`.
    #[must_use]
    pub fn subscription_expired(&self, now: OffsetDateTime) -> bool {
        self.subscription_expires_at.is_some_and(|at| at < now)
    }
}

/// Partial update merged into the store by `SessionStore::set`.
///
/// `None` fields leave the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionPatch {
    pub access_token: Option<String>,
    pub client_id: Option<String>,
    pub user_id: Option<String>,
    pub user_kind: Option<String>,
    pub organization: Option<String>,
    pub organization_id: Option<String>,
    pub subscription_expires_at: Option<OffsetDateTime>,
}

impl SessionPatch {
    /// Patch carrying the three credential fields.
    #[must_use]
    pub fn credentials(access_token: &str, client_id: &str, user_id: &str) -> Self {
        Self {
            access_token: Some(access_token.to_owned()),
            client_id: Some(client_id.to_owned()),
            user_id: Some(user_id.to_owned()),
            ..Self::default()
        }
    }

    /// Build a patch from a header lookup, keeping only recognized keys.
    ///
    /// Blank values count as absent so they never overwrite a stored field.
    pub fn from_lookup<'a, F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let present = |key: &str| lookup(key).map(str::trim).filter(|v| !v.is_empty());
        let owned = |key: &str| present(key).map(str::to_owned);
        Self {
            access_token: owned(ACCESS_TOKEN_KEY),
            client_id: owned(CLIENT_KEY),
            user_id: owned(UID_KEY),
            user_kind: owned(USER_KIND_KEY),
            organization: owned(ORGANIZATION_KEY),
            organization_id: owned(ORGANIZATION_ID_KEY),
            subscription_expires_at: present(SUBSCRIPTION_EXPIRES_AT_KEY).and_then(parse_timestamp),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Storage entries this patch writes, as `(key, value)` pairs.
    pub(crate) fn entries(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        let text_fields = [
            (ACCESS_TOKEN_KEY, &self.access_token),
            (CLIENT_KEY, &self.client_id),
            (UID_KEY, &self.user_id),
            (USER_KIND_KEY, &self.user_kind),
            (ORGANIZATION_KEY, &self.organization),
            (ORGANIZATION_ID_KEY, &self.organization_id),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                out.push((key, value.clone()));
            }
        }
        if let Some(raw) = self.subscription_expires_at.and_then(format_timestamp) {
            out.push((SUBSCRIPTION_EXPIRES_AT_KEY, raw));
        }
        out
    }
}

/// In-memory projection of the signed-in user's identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Parse an expiry timestamp as sent by the API.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS UTC`, and a bare `YYYY-MM-DD`
/// (midnight UTC). Anything else yields `None`.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts);
    }
    let utc_suffixed = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    if let Ok(ts) = time::PrimitiveDateTime::parse(raw, utc_suffixed) {
        return Some(ts.assume_utc());
    }
    let date_only = format_description!("[year]-[month]-[day]");
    time::Date::parse(raw, date_only)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Format a timestamp for storage. `None` only for years outside RFC 3339 range.
#[must_use]
pub fn format_timestamp(ts: OffsetDateTime) -> Option<String> {
    ts.format(&Rfc3339).ok()
}
