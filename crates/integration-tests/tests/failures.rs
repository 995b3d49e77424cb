//! Integration tests for failure handling: unreachable backend, unusable
//! tokens and unauthenticated access.

use classroom_client::{ClassroomClient, Decision, MemoryStore, Page, Portal, ViewError};
use classroom_integration_tests::MockBackend;
use secrecy::SecretString;
use url::Url;

/// A portal pointed at a port nothing listens on.
async fn unreachable_portal() -> Portal<MemoryStore> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let url = Url::parse(&format!("http://127.0.0.1:{port}/api")).unwrap();
    Portal::new(
        MemoryStore::new(),
        ClassroomClient::with_http_client(&url, reqwest::Client::new()),
    )
}

#[tokio::test]
async fn test_transport_failure_shows_generic_login_message() {
    let mut portal = unreachable_portal().await;

    let err = portal
        .login("arnold", &SecretString::from("hunter2"))
        .await
        .unwrap_err();
    let ViewError::Message(flash) = err else {
        panic!("expected a message, got {err:?}");
    };
    assert_eq!(flash.text, "An error occurred during login.");
    assert!(!portal.gate().is_authenticated());
}

#[tokio::test]
async fn test_malformed_token_establishes_nothing() {
    let backend = MockBackend::spawn().await.unwrap();
    backend.seed_user("arnold", "hunter2", "student").await;
    backend.state().lock().await.token_override = Some("not-a-jwt".to_owned());
    let mut portal = backend.portal();

    let err = portal
        .login("arnold", &SecretString::from("hunter2"))
        .await
        .unwrap_err();
    assert!(matches!(err, ViewError::Message(_)));
    assert!(!portal.gate().is_authenticated());
    assert!(portal.gate().store().is_empty());
    assert_eq!(
        portal.open(Page::StudentDashboard),
        Decision::Redirect(Page::Entry)
    );
}

#[tokio::test]
async fn test_token_without_role_establishes_nothing() {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"arnold","exp":4102444800}"#);
    let backend = MockBackend::spawn().await.unwrap();
    backend.seed_user("arnold", "hunter2", "student").await;
    backend.state().lock().await.token_override = Some(format!("e30.{payload}.sig"));
    let mut portal = backend.portal();

    assert!(
        portal
            .login("arnold", &SecretString::from("hunter2"))
            .await
            .is_err()
    );
    assert_eq!(portal.gate().landing(), Page::Entry);
}

#[tokio::test]
async fn test_unauthenticated_requests_never_reach_backend() {
    let backend = MockBackend::spawn().await.unwrap();
    let portal = backend.portal();

    for result in [
        portal.teacher_assignments().await.map(|_| ()),
        portal.student_assignments().await.map(|_| ()),
        portal.my_submissions().await.map(|_| ()),
    ] {
        assert!(matches!(result, Err(ViewError::Redirect(Page::Entry))));
    }
    assert!(backend.requests().await.is_empty());
}
