//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render layout chrome and notifications while reading shared
//! state from Leptos context providers.

pub mod sidebar;
pub mod toast;
pub mod user_profile;
