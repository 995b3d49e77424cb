//! Integration tests for signup, login, logout and page routing.

use classroom_client::api::NewUser;
use classroom_client::{Decision, FileStore, FlashKind, Page, Portal, SessionGate, ViewError};
use classroom_core::Role;
use classroom_integration_tests::MockBackend;
use secrecy::SecretString;

fn password(p: &str) -> SecretString {
    SecretString::from(p)
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_student_login_lands_on_student_dashboard() {
    let backend = MockBackend::spawn().await.unwrap();
    backend.seed_user("arnold", "hunter2", "student").await;
    let mut portal = backend.portal();

    let nav = portal.login("arnold", &password("hunter2")).await.unwrap();
    assert_eq!(nav.flash.kind, FlashKind::Success);
    assert_eq!(nav.flash.text, "Login successful!");
    assert_eq!(nav.to, Page::StudentDashboard);

    let session = portal.gate().current().unwrap();
    assert_eq!(session.role, Role::Student);
    assert_eq!(session.subject, "arnold");
}

#[tokio::test]
async fn test_teacher_login_and_page_guards() {
    let backend = MockBackend::spawn().await.unwrap();
    backend.seed_user("ms_frizzle", "magic", "teacher").await;
    let mut portal = backend.portal();

    let nav = portal.login("ms_frizzle", &password("magic")).await.unwrap();
    assert_eq!(nav.to, Page::TeacherDashboard);

    assert_eq!(portal.open(Page::TeacherDashboard), Decision::Allow);
    assert_eq!(
        portal.open(Page::StudentDashboard),
        Decision::Redirect(Page::TeacherDashboard)
    );
    assert_eq!(
        portal.open(Page::Entry),
        Decision::Redirect(Page::TeacherDashboard)
    );
}

#[tokio::test]
async fn test_login_rejected_shows_backend_detail() {
    let backend = MockBackend::spawn().await.unwrap();
    backend.seed_user("arnold", "hunter2", "student").await;
    let mut portal = backend.portal();

    let err = portal.login("arnold", &password("wrong")).await.unwrap_err();
    let ViewError::Message(flash) = err else {
        panic!("expected a message, got {err:?}");
    };
    assert_eq!(flash.kind, FlashKind::Error);
    assert_eq!(flash.text, "Incorrect username or password");
    assert!(!portal.gate().is_authenticated());
}

#[tokio::test]
async fn test_login_while_logged_in_is_redirected() {
    let backend = MockBackend::spawn().await.unwrap();
    backend.seed_user("arnold", "hunter2", "student").await;
    backend.seed_user("ms_frizzle", "magic", "teacher").await;
    let mut portal = backend.portal();

    portal.login("ms_frizzle", &password("magic")).await.unwrap();
    let sent = backend.requests().await.len();

    let err = portal.login("arnold", &password("hunter2")).await.unwrap_err();
    assert!(matches!(err, ViewError::Redirect(Page::TeacherDashboard)));
    assert_eq!(backend.requests().await.len(), sent);

    let session = portal.gate().current().unwrap();
    assert_eq!(session.role, Role::Teacher);
    assert_eq!(session.subject, "ms_frizzle");
}

#[tokio::test]
async fn test_malformed_token_while_logged_in_keeps_session() {
    let backend = MockBackend::spawn().await.unwrap();
    backend.seed_user("arnold", "hunter2", "student").await;
    let mut portal = backend.portal();
    portal.login("arnold", &password("hunter2")).await.unwrap();

    backend.state().lock().await.token_override = Some("not-a-jwt".to_owned());
    let err = portal.login("arnold", &password("hunter2")).await.unwrap_err();
    assert!(matches!(err, ViewError::Redirect(Page::StudentDashboard)));
    assert_eq!(portal.gate().landing(), Page::StudentDashboard);
}

// =============================================================================
// Signup
// =============================================================================

#[tokio::test]
async fn test_signup_then_login() {
    let backend = MockBackend::spawn().await.unwrap();
    let mut portal = backend.portal();

    let flash = portal
        .signup(&NewUser {
            username: "wanda".to_owned(),
            password: password("bus"),
            role: Role::Student,
        })
        .await
        .unwrap();
    assert_eq!(flash.text, "Signup successful! You can now log in.");
    assert!(!portal.gate().is_authenticated());

    let nav = portal.login("wanda", &password("bus")).await.unwrap();
    assert_eq!(nav.to, Page::StudentDashboard);
}

#[tokio::test]
async fn test_signup_duplicate_username_shows_detail() {
    let backend = MockBackend::spawn().await.unwrap();
    backend.seed_user("wanda", "bus", "student").await;
    let portal = backend.portal();

    let err = portal
        .signup(&NewUser {
            username: "wanda".to_owned(),
            password: password("other"),
            role: Role::Teacher,
        })
        .await
        .unwrap_err();
    let ViewError::Message(flash) = err else {
        panic!("expected a message, got {err:?}");
    };
    assert_eq!(flash.text, "Username already registered");
}

// =============================================================================
// Logout
// =============================================================================

#[tokio::test]
async fn test_logout_returns_to_entry() {
    let backend = MockBackend::spawn().await.unwrap();
    backend.seed_user("arnold", "hunter2", "student").await;
    let mut portal = backend.portal();
    portal.login("arnold", &password("hunter2")).await.unwrap();

    assert_eq!(portal.logout().unwrap(), Page::Entry);
    assert!(!portal.gate().is_authenticated());
    assert_eq!(portal.open(Page::Entry), Decision::Allow);
    assert_eq!(
        portal.open(Page::StudentDashboard),
        Decision::Redirect(Page::Entry)
    );
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_file_session_survives_restart() {
    let backend = MockBackend::spawn().await.unwrap();
    backend.seed_user("arnold", "hunter2", "student").await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut portal = Portal::new(FileStore::open(&path), backend.client());
    portal.login("arnold", &password("hunter2")).await.unwrap();
    drop(portal);

    let gate = SessionGate::new(FileStore::open(&path));
    assert_eq!(gate.landing(), Page::StudentDashboard);
    assert_eq!(gate.current().unwrap().subject, "arnold");

    let mut portal = Portal::new(FileStore::open(&path), backend.client());
    portal.logout().unwrap();
    assert!(!SessionGate::new(FileStore::open(&path)).is_authenticated());
}
