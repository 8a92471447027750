//! Toast notification queue.
//!
//! API failures surface here as one toast per normalized message. The queue
//! is bounded; pushing past [`MAX_TOASTS`] drops the oldest entry. Each toast
//! dismisses itself after [`TOAST_LIFE`].

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

use std::collections::VecDeque;
use std::time::Duration;

use session::{ApiError, NormalizedError};

pub const MAX_TOASTS: usize = 5;
pub const TOAST_LIFE: Duration = Duration::from_millis(3000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Error,
}

impl Severity {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "toast toast--success",
            Self::Info => "toast toast--info",
            Self::Error => "toast toast--error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToastState {
    pub toasts: VecDeque<Toast>,
    next_id: u64,
}

impl ToastState {
    /// Append a toast and return its id.
    pub fn push(&mut self, severity: Severity, summary: impl Into<String>, detail: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push_back(Toast { id, severity, summary: summary.into(), detail: detail.into() });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
        id
    }

    /// One `Error <code>` toast per message.
    pub fn push_error(&mut self, error: &NormalizedError) {
        let summary = format!("Error {}", error.code);
        for message in &error.messages {
            self.push(Severity::Error, summary.clone(), message.clone());
        }
    }

    pub fn push_api_error(&mut self, error: &ApiError) {
        log::debug!("toast: {error}");
        self.push_error(&error.normalized());
    }

    /// Id the next pushed toast will get.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Ids of live toasts pushed at or after `first`, oldest first.
    pub fn ids_since(&self, first: u64) -> Vec<u64> {
        self.toasts.iter().map(|t| t.id).filter(|id| *id >= first).collect()
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }
}
