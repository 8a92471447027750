//! API endpoint and navigation configuration.
//!
//! Optional environment variables:
//! - `API_URL`: API base URL (default: same origin, empty)
//! - `AUTH_LOGIN_PATH`: default `/auth/login`
//! - `AUTH_LANDING_PATH`: default `/landing`

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::guard::DEFAULT_LOGIN_PATH;

pub const DEFAULT_LANDING_PATH: &str = "/landing";
pub const DEFAULT_HOME_PATH: &str = "/";

/// Errors produced while building an [`ApiConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API base URL `{0}`: expected http:// or https://")]
    InvalidBaseUrl(String),
    #[error("invalid route `{0}`: must start with `/`")]
    InvalidPath(String),
}

/// Paths of the authentication endpoints, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthRoutes {
    pub register: String,
    pub sign_in: String,
    /// Forgot (`POST`) and reset (`PATCH`) share one resource.
    pub password: String,
    pub sign_out: String,
}

impl Default for AuthRoutes {
    fn default() -> Self {
        Self {
            register: "/auth/register".to_owned(),
            sign_in: "/auth/v1/users/sign_in".to_owned(),
            password: "/auth/v1/users/password".to_owned(),
            sign_out: "/auth/v1/users/sign_out".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without trailing slash; empty means same origin.
    pub base_url: String,
    /// Redirect target for unauthenticated visitors.
    pub login_path: String,
    /// Redirect target after a forced logout (401, expired subscription).
    pub landing_path: String,
    /// Where authenticated visitors land after login/registration.
    pub home_path: String,
    pub routes: AuthRoutes,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            landing_path: DEFAULT_LANDING_PATH.to_owned(),
            home_path: DEFAULT_HOME_PATH.to_owned(),
            routes: AuthRoutes::default(),
        }
    }
}

impl ApiConfig {
    /// Build config from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup("API_URL") {
            config = config.with_base_url(&raw)?;
        }
        if let Some(path) = lookup("AUTH_LOGIN_PATH") {
            config.login_path = parse_path(&path)?;
        }
        if let Some(path) = lookup("AUTH_LANDING_PATH") {
            config.landing_path = parse_path(&path)?;
        }
        Ok(config)
    }

    /// Replace the base URL. Blank input means same origin.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for non-HTTP URLs.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.base_url = String::new();
            return Ok(self);
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(trimmed.to_owned()));
        }
        self.base_url = trimmed.trim_end_matches('/').to_owned();
        Ok(self)
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn parse_path(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.starts_with('/') {
        Ok(trimmed.to_owned())
    } else {
        Err(ConfigError::InvalidPath(trimmed.to_owned()))
    }
}
