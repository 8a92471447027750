//! Transport interceptor: session policy around every HTTP call.
//!
//! ARCHITECTURE
//! ============
//! `send` = attach credentials -> transport -> `inspect`. The post-response
//! hook `inspect` is the only place where API traffic mutates the session, and
//! it reacts to a fixed list of triggers, checked in order:
//!
//! 1. `subscription-expires-at` in the past: clear, redirect to landing,
//!    fail with `SessionExpired` (any status).
//! 2. 401: clear, redirect to landing, fail with `{401, ["unauthorized"]}`.
//! 3. 2xx carrying an `access-token` header: merge recognized headers.
//! 4. Any other non-2xx: fail with the normalized body.
//!
//! Nothing is retried here; retry policy belongs to the caller.

#[cfg(test)]
#[path = "interceptor_test.rs"]
mod interceptor_test;

use std::rc::Rc;

use time::OffsetDateTime;

use crate::config::{ApiConfig, DEFAULT_LANDING_PATH};
use crate::error::{ApiError, NormalizedError};
use crate::guard::Navigator;
use crate::record::{
    ACCESS_TOKEN_KEY, CLIENT_KEY, SUBSCRIPTION_EXPIRES_AT_KEY, SessionPatch, UID_KEY, parse_timestamp,
};
use crate::storage::KeyValueStorage;
use crate::store::SessionStore;
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Session-aware wrapper around a [`Transport`].
pub struct Interceptor<T, S> {
    transport: T,
    store: SessionStore<S>,
    navigator: Option<Rc<dyn Navigator>>,
    landing_path: String,
    clock: fn() -> OffsetDateTime,
}

impl<T: Transport, S: KeyValueStorage> Interceptor<T, S> {
    pub fn new(transport: T, store: SessionStore<S>) -> Self {
        Self {
            transport,
            store,
            navigator: None,
            landing_path: DEFAULT_LANDING_PATH.to_owned(),
            clock: OffsetDateTime::now_utc,
        }
    }

    /// Interceptor using the landing path from `config`.
    pub fn from_config(transport: T, store: SessionStore<S>, config: &ApiConfig) -> Self {
        Self::new(transport, store).with_landing_path(config.landing_path.clone())
    }

    /// Router used for the forced redirect after a session ends.
    ///
    /// Without one, the redirect is only reported through the returned error.
    #[must_use]
    pub fn with_navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Some(Rc::new(navigator));
        self
    }

    #[must_use]
    pub fn with_landing_path(mut self, path: impl Into<String>) -> Self {
        self.landing_path = path.into();
        self
    }

    /// Replace the wall clock used for expiry checks.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` with stored credentials attached and run the
    /// post-response hook.
    ///
    /// # Errors
    ///
    /// [`ApiError::Transport`] when no response arrives; otherwise whatever
    /// [`Interceptor::inspect`] decides.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let request = self.attach_credentials(request);
        let method = request.method.as_str();
        let path = request.path.clone();
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("http: {method} {path} failed: {e}");
                return Err(e.into());
            }
        };
        log::debug!("http: {method} {path} -> {}", response.status);
        self.inspect(response)
    }

    /// Add credential headers for every stored credential field.
    ///
    /// Nothing is attached unless an access token is stored.
    #[must_use]
    pub fn attach_credentials(&self, mut request: HttpRequest) -> HttpRequest {
        let record = self.store.get();
        let Some(token) = record.access_token.filter(|t| !t.is_empty()) else {
            return request;
        };
        request = request
            .with_header("authorization", format!("Bearer {token}"))
            .with_header(ACCESS_TOKEN_KEY, token);
        if let Some(client) = record.client_id {
            request = request.with_header(CLIENT_KEY, client);
        }
        if let Some(uid) = record.user_id {
            request = request.with_header(UID_KEY, uid);
        }
        request
    }

    /// Post-response hook. Applies the session triggers and converts error
    /// statuses into [`ApiError`]s.
    ///
    /// # Errors
    ///
    /// [`ApiError::SessionExpired`] for a past subscription expiry,
    /// [`ApiError::Http`] for any non-2xx status, [`ApiError::Storage`] when a
    /// credential refresh could not be persisted.
    pub fn inspect(&self, response: HttpResponse) -> Result<HttpResponse, ApiError> {
        let now = (self.clock)();
        if let Some(expires_at) = response
            .header(SUBSCRIPTION_EXPIRES_AT_KEY)
            .and_then(parse_timestamp)
            .filter(|at| *at < now)
        {
            log::warn!("session: subscription expired at {expires_at}, logging out");
            self.force_logout();
            return Err(ApiError::SessionExpired { expires_at });
        }

        if response.status == 401 {
            log::warn!("session: 401 from API, logging out");
            self.force_logout();
            return Err(NormalizedError::unauthorized().into());
        }

        if response.is_success() {
            if let Some(patch) = refreshed_credentials(&response) {
                let was = self.store.state();
                self.store.set(patch)?;
                log::info!("session: credentials refreshed ({was:?} -> {:?})", self.store.state());
            }
            return Ok(response);
        }

        Err(NormalizedError::from_body(response.status, response.body.as_ref()).into())
    }

    fn force_logout(&self) {
        if let Err(e) = self.store.clear() {
            log::warn!("session: clear after forced logout failed: {e}");
        }
        match &self.navigator {
            Some(navigator) => navigator.navigate(&self.landing_path),
            None => log::debug!("session: no navigator for redirect to {}", self.landing_path),
        }
    }
}

/// Credential patch carried by a response, if it refreshes the session.
///
/// The `access-token` header is the refresh trigger; every other recognized
/// header present alongside it is merged too.
#[must_use]
pub fn refreshed_credentials(response: &HttpResponse) -> Option<SessionPatch> {
    let token = response.header(ACCESS_TOKEN_KEY)?;
    if token.is_empty() {
        return None;
    }
    Some(SessionPatch::from_lookup(|key| response.header(key)))
}
