//! Authentication session core shared by the browser `client` and the `cli`.
//!
//! This crate owns the session lifecycle: the durable [`SessionStore`], the
//! [`SessionGuard`] consulted by protected views, and the [`Interceptor`]
//! that wraps every HTTP call to keep the store in sync with the API.
//! It has no browser dependency; collaborators (storage, transport, router)
//! are traits implemented by the embedding crate.
//!
//! SESSION LIFECYCLE
//! =================
//! `LoggedOut -> LoggedIn` on login/registration, `LoggedIn -> LoggedIn` on a
//! credential refresh, `LoggedIn -> LoggedOut` on logout, a 401 response, or an
//! expired subscription. There is no terminal state.

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod interceptor;
pub mod record;
pub mod storage;
pub mod store;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use api::{AuthApi, ForgotPasswordRequest, RegisterRequest, ResetPasswordRequest, SignInRequest};
pub use config::{ApiConfig, AuthRoutes, ConfigError};
pub use error::{ApiError, NormalizedError};
pub use guard::{Navigator, SessionGuard};
pub use interceptor::Interceptor;
pub use record::{CurrentUser, SessionPatch, SessionRecord, SessionState};
pub use storage::{KeyValueStorage, MemoryStorage, StorageError};
pub use store::SessionStore;
pub use transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
