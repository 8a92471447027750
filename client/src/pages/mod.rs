//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Public pages forward authenticated visitors home; the
//! dashboard sits behind the session guard.

pub mod dashboard;
pub mod forgot_password;
pub mod landing;
pub mod login;
pub mod register;
pub mod reset_password;
pub mod success;
