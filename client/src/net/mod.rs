//! Networking: browser collaborators for the session core.
//!
//! SYSTEM CONTEXT
//! ==============
//! `browser` implements storage, transport, and origin lookup over web APIs;
//! `api` wires them into the session crate's `AuthApi`.

pub mod api;
pub mod browser;
