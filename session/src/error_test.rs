use super::*;
use serde_json::json;
use time::macros::datetime;

// =============================================================
// NormalizedError::from_body
// =============================================================

#[test]
fn errors_array_is_used_verbatim() {
    let body = json!({ "errors": ["Email já cadastrado", "Senha muito curta"] });
    assert_eq!(
        NormalizedError::from_body(422, Some(&body)),
        NormalizedError::new(422, vec!["Email já cadastrado".to_owned(), "Senha muito curta".to_owned()])
    );
}

#[test]
fn singular_error_becomes_one_message() {
    let body = json!({ "error": "invalid credentials" });
    assert_eq!(
        NormalizedError::from_body(401, Some(&body)),
        NormalizedError::new(401, vec!["invalid credentials".to_owned()])
    );
}

#[test]
fn errors_array_wins_over_error_string() {
    let body = json!({ "errors": ["a"], "error": "b" });
    assert_eq!(NormalizedError::from_body(400, Some(&body)).messages, vec!["a".to_owned()]);
}

#[test]
fn message_field_is_last_resort_before_unknown() {
    let body = json!({ "message": "rate limited" });
    assert_eq!(
        NormalizedError::from_body(429, Some(&body)),
        NormalizedError::new(429, vec!["rate limited".to_owned()])
    );
}

#[test]
fn object_without_known_fields_keeps_status() {
    let body = json!({ "details": "x" });
    assert_eq!(
        NormalizedError::from_body(404, Some(&body)),
        NormalizedError::new(404, vec![UNKNOWN_ERROR_MESSAGE.to_owned()])
    );
}

#[test]
fn empty_errors_array_falls_through() {
    let body = json!({ "errors": [], "error": "fallback" });
    assert_eq!(NormalizedError::from_body(422, Some(&body)).messages, vec!["fallback".to_owned()]);
}

#[test]
fn non_string_error_items_are_stringified() {
    let body = json!({ "errors": [{ "field": "email" }, null, 3] });
    assert_eq!(
        NormalizedError::from_body(422, Some(&body)).messages,
        vec![r#"{"field":"email"}"#.to_owned(), "3".to_owned()]
    );
}

#[test]
fn absent_or_malformed_body_is_unknown_500() {
    assert_eq!(NormalizedError::from_body(404, None), NormalizedError::unknown());
    assert_eq!(NormalizedError::from_body(502, Some(&json!("oops"))), NormalizedError::unknown());
    assert_eq!(NormalizedError::from_body(400, Some(&json!(["x"]))), NormalizedError::unknown());
}

#[test]
fn normalized_error_display() {
    let err = NormalizedError::new(422, vec!["a".to_owned(), "b".to_owned()]);
    assert_eq!(err.to_string(), "422: a; b");
}

// =============================================================
// ApiError
// =============================================================

#[test]
fn http_error_normalizes_to_itself() {
    let err = ApiError::from(NormalizedError::unauthorized());
    assert_eq!(err.normalized(), NormalizedError::unauthorized());
    assert!(err.ended_session());
}

#[test]
fn validation_error_normalizes_to_422() {
    let err = ApiError::Validation("Passwords do not match".to_owned());
    assert!(err.is_validation());
    assert_eq!(err.normalized(), NormalizedError::new(422, vec!["Passwords do not match".to_owned()]));
}

#[test]
fn transport_error_normalizes_to_503() {
    let err = ApiError::from(TransportError("connection refused".to_owned()));
    assert_eq!(err.code(), 503);
    assert_eq!(err.normalized().messages, vec!["transport failure: connection refused".to_owned()]);
}

#[test]
fn session_expired_ends_session() {
    let err = ApiError::SessionExpired { expires_at: datetime!(2020-01-01 0:00 UTC) };
    assert!(err.ended_session());
    assert_eq!(err.code(), 401);
}

#[test]
fn other_http_errors_do_not_end_session() {
    let err = ApiError::Http { code: 403, messages: vec!["forbidden".to_owned()] };
    assert!(!err.ended_session());
    assert_eq!(err.to_string(), "request failed (403): forbidden");
}
