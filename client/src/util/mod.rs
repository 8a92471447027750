//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate routing and form concerns from page and component
//! logic to improve reuse and testability.

pub mod form;
pub mod guard;
