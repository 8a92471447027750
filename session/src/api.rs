//! Authentication API calls.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views call these instead of building requests themselves. Every call goes
//! through the [`Interceptor`], so credential headers on the response land in
//! the store before the call returns. Input checks that need no server run
//! first and fail with [`ApiError::Validation`] without touching the network.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Serialize;
use serde_json::Value;

use crate::config::{ApiConfig, AuthRoutes};
use crate::error::ApiError;
use crate::interceptor::Interceptor;
use crate::record::CurrentUser;
use crate::storage::KeyValueStorage;
use crate::store::SessionStore;
use crate::transport::{HttpRequest, HttpResponse, Transport};

pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";

/// `POST /auth/register` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub image_url: String,
}

/// Sign-in payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Forgot-password payload; `redirect_url` is where the reset link points.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
    pub redirect_url: String,
}

/// Reset-password payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResetPasswordRequest {
    pub reset_password_token: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegisterRequest {
    /// Local checks run before any request.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] for a blank required field or mismatched
    /// password confirmation.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)?;
        require_email(&self.email)?;
        require("password", &self.password)?;
        confirm(&self.password, &self.password_confirmation)
    }
}

impl SignInRequest {
    /// # Errors
    ///
    /// [`ApiError::Validation`] for a blank field.
    pub fn validate(&self) -> Result<(), ApiError> {
        require_email(&self.email)?;
        require("password", &self.password)
    }
}

impl ForgotPasswordRequest {
    /// # Errors
    ///
    /// [`ApiError::Validation`] for a blank email.
    pub fn validate(&self) -> Result<(), ApiError> {
        require_email(&self.email)
    }
}

impl ResetPasswordRequest {
    /// # Errors
    ///
    /// [`ApiError::Validation`] for a missing token, blank password, or
    /// mismatched confirmation.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("reset token", &self.reset_password_token)?;
        require("password", &self.password)?;
        confirm(&self.password, &self.password_confirmation)
    }
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_email(value: &str) -> Result<(), ApiError> {
    require("email", value)?;
    if !value.contains('@') {
        return Err(ApiError::Validation("email is invalid".to_owned()));
    }
    Ok(())
}

fn confirm(password: &str, confirmation: &str) -> Result<(), ApiError> {
    if password != confirmation {
        return Err(ApiError::Validation(PASSWORD_MISMATCH_MESSAGE.to_owned()));
    }
    Ok(())
}

fn to_json<T: Serialize>(payload: &T) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Pull `{id, name, email}` out of a login/registration body.
///
/// Looks at a nested `user` or `data` object first, then the top level. Numeric
/// ids are accepted. Returns `None` when no identity field is present.
#[must_use]
pub fn extract_user(body: Option<&Value>) -> Option<CurrentUser> {
    let root = body?.as_object()?;
    let candidates = ["user", "data"]
        .iter()
        .filter_map(|key| root.get(*key).and_then(Value::as_object))
        .chain(std::iter::once(root));

    for fields in candidates {
        let text = |key: &str| match fields.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let (id, name, email) = (text("id"), text("name"), text("email"));
        if id.is_some() || email.is_some() {
            return Some(CurrentUser {
                id: id.unwrap_or_default(),
                name: name.unwrap_or_default(),
                email: email.unwrap_or_default(),
            });
        }
    }
    None
}

/// Authentication endpoints bound to one interceptor.
pub struct AuthApi<T, S> {
    interceptor: Interceptor<T, S>,
    routes: AuthRoutes,
}

impl<T: Transport, S: KeyValueStorage> AuthApi<T, S> {
    pub fn new(interceptor: Interceptor<T, S>, routes: AuthRoutes) -> Self {
        Self { interceptor, routes }
    }

    /// API over `transport` and `store` configured from `config`.
    pub fn from_config(transport: T, store: SessionStore<S>, config: &ApiConfig) -> Self {
        Self::new(Interceptor::from_config(transport, store, config), config.routes.clone())
    }

    pub fn interceptor(&self) -> &Interceptor<T, S> {
        &self.interceptor
    }

    pub fn store(&self) -> &SessionStore<S> {
        self.interceptor.store()
    }

    /// Create an account. On success the session is populated from the
    /// response headers and the current user from the body.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] before any request, otherwise whatever the
    /// interceptor reports.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<CurrentUser>, ApiError> {
        request.validate()?;
        let http = HttpRequest::post(self.routes.register.clone()).with_json(to_json(request)?);
        let response = self.interceptor.send(http).await?;
        log::info!("auth: registered {}", request.email);
        self.remember_user(&response)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] before any request, otherwise whatever the
    /// interceptor reports.
    pub async fn sign_in(&self, request: &SignInRequest) -> Result<Option<CurrentUser>, ApiError> {
        request.validate()?;
        let http = HttpRequest::post(self.routes.sign_in.clone()).with_json(to_json(request)?);
        let response = self.interceptor.send(http).await?;
        log::info!("auth: signed in as {} ({:?})", request.email, self.store().state());
        self.remember_user(&response)
    }

    /// Ask the API to email a password reset link.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] before any request, otherwise whatever the
    /// interceptor reports.
    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<(), ApiError> {
        request.validate()?;
        let http = HttpRequest::post(self.routes.password.clone()).with_json(to_json(request)?);
        self.interceptor.send(http).await?;
        Ok(())
    }

    /// Set a new password using a reset token.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] before any request, otherwise whatever the
    /// interceptor reports.
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiError> {
        request.validate()?;
        let http = HttpRequest::patch(self.routes.password.clone()).with_json(to_json(request)?);
        self.interceptor.send(http).await?;
        Ok(())
    }

    /// End the session on the server, then clear the local store even if the
    /// server call failed.
    ///
    /// # Errors
    ///
    /// The server call's error, or [`ApiError::Storage`] if clearing failed
    /// after a successful call.
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        let result = self
            .interceptor
            .send(HttpRequest::delete(self.routes.sign_out.clone()))
            .await;
        let cleared = self.store().clear();
        log::info!("auth: signed out");
        result?;
        cleared?;
        Ok(())
    }

    fn remember_user(&self, response: &HttpResponse) -> Result<Option<CurrentUser>, ApiError> {
        let user = extract_user(response.body.as_ref());
        if let Some(user) = &user {
            self.store().set_current_user(Some(user))?;
        }
        Ok(user)
    }
}
