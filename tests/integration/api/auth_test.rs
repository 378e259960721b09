//! Authentication API integration tests
//!
//! Drive the session store against a mock identity API over real HTTP.

use std::time::Duration;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use rollcall::client::{route, Destination, SessionStore};
use rollcall::shared::{AuthError, Session};
use serde_json::json;

use crate::common::*;

async fn setup() -> (MockIdentityApi, tempfile::TempDir) {
    (MockIdentityApi::start().await, tempfile::tempdir().unwrap())
}

fn store_for(api: &MockIdentityApi, dir: &tempfile::TempDir) -> SessionStore {
    let config = api.config(&dir.path().join("session.json"));
    crate::assert_ok!(SessionStore::from_config(&config))
}

#[tokio::test]
async fn test_login_success() {
    let (api, dir) = setup().await;
    api.respond("/login", 200, success_body(&teacher())).await;
    let store = store_for(&api, &dir);
    store.init();

    let identity = crate::assert_ok!(store.login(TEACHER_EMAIL, PASSWORD).await);

    assert_eq!(identity, teacher());
    crate::assert_signed_in_as!(store.current(), TEACHER_EMAIL);
    assert_eq!(route(&store.current()), Destination::TeacherHome);
    assert!(dir.path().join("session.json").exists());
}

#[tokio::test]
async fn test_login_rejected_by_backend() {
    let (api, dir) = setup().await;
    api.respond("/login", 200, json!({ "success": false })).await;
    let store = store_for(&api, &dir);
    store.init();

    let result = store.login("a@b.com", "pw").await;

    crate::assert_err!(result, AuthError::InvalidCredentials { .. });
    assert_eq!(store.current(), Session::Anonymous);
}

#[tokio::test]
async fn test_backend_error_text_is_surfaced() {
    let (api, dir) = setup().await;
    api.respond("/login", 200, failure_body("Incorrect password")).await;
    let store = store_for(&api, &dir);
    store.init();

    let error = store.login(TEACHER_EMAIL, "nope").await.unwrap_err();
    assert_eq!(error.user_message(), "Incorrect password");
}

#[tokio::test]
async fn test_empty_credentials_send_nothing() {
    let (api, dir) = setup().await;
    api.respond("/login", 200, success_body(&teacher())).await;
    let store = store_for(&api, &dir);
    store.init();

    crate::assert_err!(store.login("", PASSWORD).await, AuthError::Validation { .. });
    crate::assert_err!(store.login(TEACHER_EMAIL, "").await, AuthError::Validation { .. });

    assert_eq!(api.request_count().await, 0);
    assert_eq!(store.current(), Session::Anonymous);
}

#[tokio::test]
async fn test_server_error_is_network_error() {
    let (api, dir) = setup().await;
    api.respond("/login", 500, json!({ "success": true })).await;
    let store = store_for(&api, &dir);
    store.init();

    let error = store.login(TEACHER_EMAIL, PASSWORD).await.unwrap_err();
    assert_matches!(error, AuthError::Network { .. });
    assert!(error.user_message().contains("try again"));
}

#[tokio::test]
async fn test_malformed_json_is_network_error() {
    let (api, dir) = setup().await;
    api.respond_raw("/login", 200, "<html>gateway</html>").await;
    let store = store_for(&api, &dir);
    store.init();

    crate::assert_err!(store.login(TEACHER_EMAIL, PASSWORD).await, AuthError::Network { .. });
}

#[tokio::test]
async fn test_success_without_user_is_unrecoverable() {
    let (api, dir) = setup().await;
    api.respond("/login", 200, json!({ "success": true })).await;
    let store = store_for(&api, &dir);
    store.init();

    let error = store.login(TEACHER_EMAIL, PASSWORD).await.unwrap_err();
    assert_matches!(error, AuthError::BackendContract { .. });
    assert!(!error.is_recoverable());
    assert_eq!(store.current(), Session::Anonymous);
}

#[tokio::test]
async fn test_slow_backend_times_out_once() {
    let (api, dir) = setup().await;
    api.login_for(TEACHER_EMAIL, success_body(&teacher()), Duration::from_secs(3)).await;
    let store = store_for(&api, &dir);
    store.init();

    crate::assert_err!(store.login(TEACHER_EMAIL, PASSWORD).await, AuthError::Network { .. });
    assert_eq!(api.request_count().await, 1);
}

#[tokio::test]
async fn test_signup_success_routes_home() {
    let (api, dir) = setup().await;
    api.respond("/signup", 200, success_body(&student())).await;
    let store = store_for(&api, &dir);
    store.init();

    let identity = crate::assert_ok!(store.signup("Ama Mensah", STUDENT_EMAIL, PASSWORD).await);

    assert_eq!(identity.avatar(), Some("https://cdn.school.edu/avatars/ama.png"));
    assert_eq!(route(&store.current()), Destination::StudentHome);
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let (api, dir) = setup().await;
    api.respond("/signup", 200, failure_body("User with this email already exists")).await;
    let store = store_for(&api, &dir);
    store.init();

    let result = store.signup("Ama Mensah", STUDENT_EMAIL, PASSWORD).await;

    assert_eq!(result, Err(AuthError::duplicate_email(STUDENT_EMAIL)));
    assert_eq!(store.current(), Session::Anonymous);
}

#[tokio::test]
async fn test_late_response_never_overwrites_newer_login() {
    let (api, dir) = setup().await;
    api.login_for(TEACHER_EMAIL, success_body(&teacher()), Duration::from_millis(300)).await;
    api.login_for(STUDENT_EMAIL, success_body(&student()), Duration::ZERO).await;
    let store = store_for(&api, &dir);
    store.init();

    let (first, second) = tokio::join!(
        store.login(TEACHER_EMAIL, PASSWORD),
        store.login(STUDENT_EMAIL, PASSWORD),
    );

    assert_eq!(first, Err(AuthError::Busy));
    assert_eq!(second, Ok(student()));
    crate::assert_signed_in_as!(store.current(), STUDENT_EMAIL);
}

#[tokio::test]
async fn test_session_survives_restart() {
    let (api, dir) = setup().await;
    api.respond("/login", 200, success_body(&admin())).await;

    let first_run = store_for(&api, &dir);
    first_run.init();
    crate::assert_ok!(first_run.login(ADMIN_EMAIL, PASSWORD).await);
    first_run.teardown();

    let second_run = store_for(&api, &dir);
    assert_eq!(route(&second_run.current()), Destination::Splash);
    assert_eq!(second_run.init(), Session::Authenticated(admin()));
    assert_eq!(route(&second_run.current()), Destination::AdminHome);

    second_run.logout();
    let third_run = store_for(&api, &dir);
    assert_eq!(third_run.init(), Session::Anonymous);
}
