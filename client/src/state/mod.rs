//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`auth`, `toast`, `ui`) so individual components
//! can depend on small focused models.

pub mod auth;
pub mod toast;
pub mod ui;
