use serde_json::json;

use super::*;
use crate::record::SessionPatch;
use crate::storage::MemoryStorage;
use crate::test_support::{RecordingNavigator, ScriptedTransport};
use crate::transport::Method;

fn api(transport: ScriptedTransport) -> (AuthApi<ScriptedTransport, MemoryStorage>, RecordingNavigator) {
    let nav = RecordingNavigator::new();
    let store = SessionStore::new(MemoryStorage::new());
    let interceptor = Interceptor::new(transport, store).with_navigator(nav.clone());
    (AuthApi::new(interceptor, AuthRoutes::default()), nav)
}

fn ana_registration() -> RegisterRequest {
    RegisterRequest {
        name: "Ana".to_owned(),
        email: "ana@example.test".to_owned(),
        password: "segredo1".to_owned(),
        password_confirmation: "segredo1".to_owned(),
        image_url: String::new(),
    }
}

fn credential_response(status: u16) -> HttpResponse {
    HttpResponse::new(status)
        .with_header("access-token", "T1")
        .with_header("client", "C1")
        .with_header("uid", "ana@example.test")
}

// =============================================================
// Registration
// =============================================================

#[tokio::test]
async fn register_mismatched_passwords_never_hits_transport() {
    let transport = ScriptedTransport::new().respond(credential_response(201));
    let requests = transport.requests();
    let (api, _) = api(transport);
    let request = RegisterRequest {
        password: "x".to_owned(),
        password_confirmation: "y".to_owned(),
        ..ana_registration()
    };

    let err = api.register(&request).await.unwrap_err();

    assert_eq!(err, ApiError::Validation(PASSWORD_MISMATCH_MESSAGE.to_owned()));
    assert!(err.is_validation());
    assert!(requests.borrow().is_empty());
    assert!(api.store().get().is_empty());
}

#[tokio::test]
async fn register_blank_name_is_rejected_locally() {
    let transport = ScriptedTransport::new();
    let requests = transport.requests();
    let (api, _) = api(transport);
    let request = RegisterRequest { name: "  ".to_owned(), ..ana_registration() };

    let err = api.register(&request).await.unwrap_err();

    assert_eq!(err, ApiError::Validation("name is required".to_owned()));
    assert!(requests.borrow().is_empty());
}

#[tokio::test]
async fn register_success_populates_session_and_user() {
    let response = credential_response(201)
        .with_body(json!({ "user": { "id": 7, "name": "Ana", "email": "ana@example.test" } }));
    let transport = ScriptedTransport::new().respond(response);
    let requests = transport.requests();
    let (api, _) = api(transport);

    let user = api.register(&ana_registration()).await.unwrap();

    let user = user.unwrap();
    assert_eq!(user.id, "7");
    assert_eq!(user.name, "Ana");
    assert!(api.store().get().has_credentials());
    assert_eq!(api.store().current_user(), Some(user));

    let sent = requests.borrow();
    assert_eq!(sent[0].method, Method::Post);
    assert_eq!(sent[0].path, "/auth/register");
    let body = sent[0].body.as_ref().unwrap();
    assert_eq!(body["password_confirmation"], "segredo1");
    assert_eq!(body["image_url"], "");
}

#[tokio::test]
async fn register_server_validation_errors_are_returned() {
    let response = HttpResponse::new(422).with_body(json!({ "errors": ["Email já cadastrado"] }));
    let (api, nav) = api(ScriptedTransport::new().respond(response));

    let err = api.register(&ana_registration()).await.unwrap_err();

    assert_eq!(err.code(), 422);
    assert_eq!(err.normalized().messages, vec!["Email já cadastrado".to_owned()]);
    assert!(api.store().get().is_empty());
    assert!(nav.visits().is_empty());
}

// =============================================================
// Sign in / sign out
// =============================================================

#[tokio::test]
async fn sign_in_posts_credentials_and_stores_session() {
    let response = credential_response(200)
        .with_body(json!({ "data": { "id": "u-1", "name": "Ana", "email": "ana@example.test" } }));
    let transport = ScriptedTransport::new().respond(response);
    let requests = transport.requests();
    let (api, _) = api(transport);

    let user = api
        .sign_in(&SignInRequest { email: "ana@example.test".to_owned(), password: "segredo1".to_owned() })
        .await
        .unwrap();

    assert_eq!(user.map(|u| u.id), Some("u-1".to_owned()));
    assert_eq!(api.store().get().access_token.as_deref(), Some("T1"));
    assert_eq!(requests.borrow()[0].path, "/auth/v1/users/sign_in");
}

#[tokio::test]
async fn sign_in_without_user_body_keeps_cached_user_empty() {
    let (api, _) = api(ScriptedTransport::new().respond(credential_response(200)));

    let user = api
        .sign_in(&SignInRequest { email: "ana@example.test".to_owned(), password: "p".to_owned() })
        .await
        .unwrap();

    assert!(user.is_none());
    assert!(api.store().get().has_credentials());
    assert!(api.store().current_user().is_none());
}

#[tokio::test]
async fn sign_in_rejects_malformed_email() {
    let transport = ScriptedTransport::new();
    let requests = transport.requests();
    let (api, _) = api(transport);

    let err = api
        .sign_in(&SignInRequest { email: "ana".to_owned(), password: "p".to_owned() })
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Validation("email is invalid".to_owned()));
    assert!(requests.borrow().is_empty());
}

#[tokio::test]
async fn sign_out_clears_store_even_when_server_fails() {
    let (api, _) = api(ScriptedTransport::new().fail("offline"));
    api.store().set(SessionPatch::credentials("t", "c", "u")).unwrap();

    let err = api.sign_out().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert!(api.store().get().is_empty());
}

#[tokio::test]
async fn sign_out_sends_credentials_with_delete() {
    let transport = ScriptedTransport::new().respond(HttpResponse::new(200));
    let requests = transport.requests();
    let (api, _) = api(transport);
    api.store().set(SessionPatch::credentials("t", "c", "u")).unwrap();

    api.sign_out().await.unwrap();

    let sent = requests.borrow();
    assert_eq!(sent[0].method, Method::Delete);
    assert_eq!(sent[0].header("access-token"), Some("t"));
    assert!(api.store().get().is_empty());
}

// =============================================================
// Password recovery
// =============================================================

#[tokio::test]
async fn forgot_password_posts_redirect_url() {
    let transport = ScriptedTransport::new().respond(HttpResponse::new(200));
    let requests = transport.requests();
    let (api, _) = api(transport);

    api.forgot_password(&ForgotPasswordRequest {
        email: "ana@example.test".to_owned(),
        redirect_url: "https://app.example.test/auth/reset_password".to_owned(),
    })
    .await
    .unwrap();

    let sent = requests.borrow();
    assert_eq!(sent[0].method, Method::Post);
    assert_eq!(sent[0].path, "/auth/v1/users/password");
    assert_eq!(
        sent[0].body.as_ref().unwrap()["redirect_url"],
        "https://app.example.test/auth/reset_password"
    );
}

#[tokio::test]
async fn reset_password_uses_patch_and_checks_confirmation() {
    let transport = ScriptedTransport::new().respond(HttpResponse::new(200));
    let requests = transport.requests();
    let (api, _) = api(transport);
    let mut request = ResetPasswordRequest {
        reset_password_token: "tok".to_owned(),
        password: "novo".to_owned(),
        password_confirmation: "outro".to_owned(),
    };

    let err = api.reset_password(&request).await.unwrap_err();
    assert!(err.is_validation());
    assert!(requests.borrow().is_empty());

    request.password_confirmation = "novo".to_owned();
    api.reset_password(&request).await.unwrap();
    assert_eq!(requests.borrow()[0].method, Method::Patch);
}

#[test]
fn reset_without_token_is_rejected() {
    let err = ResetPasswordRequest::default().validate().unwrap_err();
    assert_eq!(err, ApiError::Validation("reset token is required".to_owned()));
}

// =============================================================
// User extraction
// =============================================================

#[test]
fn extract_user_reads_top_level_fields() {
    let body = json!({ "id": "9", "name": "Bia", "email": "bia@x" });
    let user = extract_user(Some(&body)).unwrap();
    assert_eq!(user, CurrentUser { id: "9".to_owned(), name: "Bia".to_owned(), email: "bia@x".to_owned() });
}

#[test]
fn extract_user_prefers_nested_user() {
    let body = json!({ "id": "outer", "user": { "id": "inner", "email": "i@x" } });
    assert_eq!(extract_user(Some(&body)).unwrap().id, "inner");
}

#[test]
fn extract_user_without_identity_is_none() {
    assert_eq!(extract_user(Some(&json!({ "status": "ok" }))), None);
    assert_eq!(extract_user(Some(&json!([1, 2]))), None);
    assert_eq!(extract_user(None), None);
}
