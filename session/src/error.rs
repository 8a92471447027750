//! Error taxonomy surfaced to views.
//!
//! ERROR HANDLING
//! ==============
//! Everything an API call can fail with is an [`ApiError`]. Views display the
//! [`NormalizedError`] projection (`code` + `messages`) as toasts or inline
//! text; none of these failures is fatal.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::storage::StorageError;
use crate::transport::TransportError;

pub const UNKNOWN_ERROR_MESSAGE: &str = "unknown error";
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized";

/// Uniform `{code, messages}` error shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedError {
    pub code: u16,
    pub messages: Vec<String>,
}

impl NormalizedError {
    #[must_use]
    pub fn new(code: u16, messages: Vec<String>) -> Self {
        Self { code, messages }
    }

    /// Fallback for absent or malformed error bodies.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(500, vec![UNKNOWN_ERROR_MESSAGE.to_owned()])
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(401, vec![UNAUTHORIZED_MESSAGE.to_owned()])
    }

    /// Normalize an HTTP error body.
    ///
    /// Messages come from an `errors` string array, else an `error` string, else
    /// a `message` string, else [`UNKNOWN_ERROR_MESSAGE`]. A body that is absent
    /// or not a JSON object yields [`NormalizedError::unknown`].
    #[must_use]
    pub fn from_body(status: u16, body: Option<&Value>) -> Self {
        let Some(Value::Object(fields)) = body else {
            return Self::unknown();
        };

        if let Some(Value::Array(items)) = fields.get("errors") {
            let messages: Vec<String> = items.iter().filter_map(message_text).collect();
            if !messages.is_empty() {
                return Self::new(status, messages);
            }
        }
        for key in ["error", "message"] {
            if let Some(Value::String(text)) = fields.get(key) {
                return Self::new(status, vec![text.clone()]);
            }
        }
        Self::new(status, vec![UNKNOWN_ERROR_MESSAGE.to_owned()])
    }
}

fn message_text(item: &Value) -> Option<String> {
    match item {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.messages.join("; "))
    }
}

/// Failure of an authentication API call.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// No response was obtained (network, DNS, aborted request).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The API answered with an error status; body normalized.
    #[error("request failed ({code}): {}", .messages.join("; "))]
    Http { code: u16, messages: Vec<String> },

    /// Input rejected locally before any network call.
    #[error("{0}")]
    Validation(String),

    /// The API reported a subscription expiry in the past; the session was cleared.
    #[error("subscription expired at {expires_at}")]
    SessionExpired { expires_at: OffsetDateTime },

    /// Durable storage rejected a session write.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A successful response carried a body of the wrong shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl From<NormalizedError> for ApiError {
    fn from(err: NormalizedError) -> Self {
        Self::Http { code: err.code, messages: err.messages }
    }
}

impl ApiError {
    /// Display code for this error.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::Transport(_) => 503,
            Self::Http { code, .. } => *code,
            Self::Validation(_) => 422,
            Self::SessionExpired { .. } => 401,
            Self::Storage(_) | Self::Decode(_) => 500,
        }
    }

    /// Project onto the `{code, messages}` display shape.
    #[must_use]
    pub fn normalized(&self) -> NormalizedError {
        match self {
            Self::Http { code, messages } => NormalizedError::new(*code, messages.clone()),
            other => NormalizedError::new(other.code(), vec![other.to_string()]),
        }
    }

    /// Whether this error ended the session (401 or expired subscription).
    #[must_use]
    pub fn ended_session(&self) -> bool {
        matches!(self, Self::SessionExpired { .. } | Self::Http { code: 401, .. })
    }

    /// Whether the error was raised locally, before any request.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
