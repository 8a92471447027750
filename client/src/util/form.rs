//! Form input normalization for the auth pages.
//!
//! Each helper trims raw input, builds the session API request, and runs its
//! local validation, returning the first failure as an inline message.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use session::{ApiError, ForgotPasswordRequest, RegisterRequest, ResetPasswordRequest, SignInRequest};

pub const RESET_PASSWORD_PATH: &str = "/auth/reset_password";
pub const RESET_TOKEN_PARAM: &str = "reset_password_token";

fn inline(result: Result<(), ApiError>) -> Result<(), String> {
    result.map_err(|e| e.to_string())
}

/// # Errors
///
/// Returns the inline message for the first invalid field.
pub fn sign_in_request(email: &str, password: &str) -> Result<SignInRequest, String> {
    let request = SignInRequest { email: email.trim().to_owned(), password: password.to_owned() };
    inline(request.validate())?;
    Ok(request)
}

/// # Errors
///
/// Returns the inline message for the first invalid field.
pub fn register_request(
    name: &str,
    email: &str,
    password: &str,
    confirmation: &str,
) -> Result<RegisterRequest, String> {
    let request = RegisterRequest {
        name: name.trim().to_owned(),
        email: email.trim().to_owned(),
        password: password.to_owned(),
        password_confirmation: confirmation.to_owned(),
        image_url: String::new(),
    };
    inline(request.validate())?;
    Ok(request)
}

/// Forgot-password request whose reset link returns to this origin.
///
/// # Errors
///
/// Returns the inline message for an invalid email.
pub fn forgot_password_request(email: &str, origin: &str) -> Result<ForgotPasswordRequest, String> {
    let request = ForgotPasswordRequest {
        email: email.trim().to_owned(),
        redirect_url: format!("{}{RESET_PASSWORD_PATH}", origin.trim_end_matches('/')),
    };
    inline(request.validate())?;
    Ok(request)
}

/// # Errors
///
/// Returns the inline message for a missing token or invalid password pair.
pub fn reset_password_request(
    token: Option<&str>,
    password: &str,
    confirmation: &str,
) -> Result<ResetPasswordRequest, String> {
    let request = ResetPasswordRequest {
        reset_password_token: token.map(str::trim).unwrap_or_default().to_owned(),
        password: password.to_owned(),
        password_confirmation: confirmation.to_owned(),
    };
    inline(request.validate())?;
    Ok(request)
}
