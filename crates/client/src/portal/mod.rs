//! View-controllers.
//!
//! A [`Portal`] pairs the session gate with the API client. Every operation
//! on a role page runs the page guard first and issues no request unless the
//! guard allows it. Failures come back as a [`ViewError`]: either a page to
//! go to instead, or a [`Flash`] message to show.
//!
//! - [`entry`] - login, signup, logout
//! - [`teacher`] - assignment creation and submission review
//! - [`student`] - assignment listing and submission

pub mod entry;
pub mod student;
pub mod teacher;

pub use entry::Navigation;

use classroom_core::{Role, Session};
use thiserror::Error;
use tracing::error;

use crate::api::{ApiError, ClassroomClient};
use crate::routing::{Decision, Page};
use crate::session::{SessionGate, SessionStore, StoreError};

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// A user-facing status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
}

impl Flash {
    /// A success message.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            text: text.into(),
        }
    }

    /// An error message.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            text: text.into(),
        }
    }
}

impl std::fmt::Display for Flash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Why a view operation did not produce its result.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The viewer is not allowed on this page and belongs on another.
    #[error("redirect to {0}")]
    Redirect(Page),

    /// The operation failed; show this message.
    #[error("{0}")]
    Message(Flash),

    /// The local session could not be written.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Messages used when an action fails.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FailureMessages {
    /// Shown when the backend refused without a usable `detail`.
    pub fallback: &'static str,
    /// Shown when the request never completed.
    pub transport: &'static str,
}

impl FailureMessages {
    /// Turn an API failure into the message the user sees.
    ///
    /// Backend `detail` text is shown verbatim. Transport failures get a
    /// generic message and are logged.
    pub(crate) fn flash(self, err: &ApiError) -> ViewError {
        let text = match err {
            ApiError::Backend { detail, .. } => detail.as_deref().unwrap_or(self.fallback),
            ApiError::Transport(e) => {
                error!(error = %e, "Request failed");
                self.transport
            }
        };
        ViewError::Message(Flash::error(text))
    }
}

/// Session gate plus API client: the controller behind every page.
#[derive(Debug)]
pub struct Portal<S> {
    gate: SessionGate<S>,
    api: ClassroomClient,
}

impl<S: SessionStore> Portal<S> {
    /// Create a portal over a session store and API client.
    #[must_use]
    pub const fn new(store: S, api: ClassroomClient) -> Self {
        Self {
            gate: SessionGate::new(store),
            api,
        }
    }

    /// The session gate.
    #[must_use]
    pub const fn gate(&self) -> &SessionGate<S> {
        &self.gate
    }

    /// The API client.
    #[must_use]
    pub const fn api(&self) -> &ClassroomClient {
        &self.api
    }

    /// Page-load guard: may the current viewer see `page`?
    #[must_use]
    pub fn open(&self, page: Page) -> Decision {
        self.gate.evaluate(page)
    }

    /// Guard for entry-page actions: a logged-in viewer is sent to their
    /// dashboard instead.
    fn require_entry(&self) -> Result<(), ViewError> {
        match self.gate.evaluate(Page::Entry) {
            Decision::Allow => Ok(()),
            Decision::Redirect(page) => Err(ViewError::Redirect(page)),
        }
    }

    /// Run the guard for a role page and return the session it admitted.
    fn authorize(&self, role: Role) -> Result<Session, ViewError> {
        match self.gate.require_role(role) {
            Decision::Allow => self
                .gate
                .current()
                .ok_or(ViewError::Redirect(Page::Entry)),
            Decision::Redirect(page) => Err(ViewError::Redirect(page)),
        }
    }
}

#[cfg(test)]
mod tests {
    use classroom_core::AccessToken;
    use reqwest::StatusCode;
    use url::Url;

    use super::*;
    use crate::session::MemoryStore;

    const MESSAGES: FailureMessages = FailureMessages {
        fallback: "Failed to load assignments.",
        transport: "An error occurred while loading assignments.",
    };

    /// A portal whose API points at a port nothing listens on.
    fn portal() -> Portal<MemoryStore> {
        let url = Url::parse("http://127.0.0.1:9/api").unwrap();
        let api = ClassroomClient::with_http_client(&url, reqwest::Client::new());
        Portal::new(MemoryStore::new(), api)
    }

    #[test]
    fn test_backend_detail_shown_verbatim() {
        let err = ApiError::Backend {
            status: StatusCode::FORBIDDEN,
            detail: Some("Operation forbidden: Only teachers can perform this action".into()),
        };
        let ViewError::Message(flash) = MESSAGES.flash(&err) else {
            panic!("expected a message");
        };
        assert_eq!(flash.kind, FlashKind::Error);
        assert_eq!(
            flash.text,
            "Operation forbidden: Only teachers can perform this action"
        );
    }

    #[test]
    fn test_backend_without_detail_uses_fallback() {
        let err = ApiError::Backend {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: None,
        };
        let ViewError::Message(flash) = MESSAGES.flash(&err) else {
            panic!("expected a message");
        };
        assert_eq!(flash.text, "Failed to load assignments.");
    }

    #[test]
    fn test_open_routes_unauthenticated_viewer_to_entry() {
        let portal = portal();
        assert_eq!(portal.open(Page::Entry), Decision::Allow);
        assert_eq!(
            portal.open(Page::TeacherDashboard),
            Decision::Redirect(Page::Entry)
        );
    }

    #[tokio::test]
    async fn test_guard_runs_before_any_request() {
        // An unauthenticated call would otherwise hit the dead port and
        // surface a transport message instead of a redirect.
        let portal = portal();
        assert!(matches!(
            portal.teacher_assignments().await,
            Err(ViewError::Redirect(Page::Entry))
        ));
        assert!(matches!(
            portal.my_submissions().await,
            Err(ViewError::Redirect(Page::Entry))
        ));
    }

    #[tokio::test]
    async fn test_wrong_role_redirected_to_own_dashboard() {
        let mut gate = SessionGate::new(MemoryStore::new());
        gate.establish(&AccessToken::new("tok"), Role::Student, "arnold")
            .unwrap();

        let url = Url::parse("http://127.0.0.1:9/api").unwrap();
        let api = ClassroomClient::with_http_client(&url, reqwest::Client::new());
        let portal = Portal::new(gate.into_store(), api);
        assert!(matches!(
            portal.teacher_assignments().await,
            Err(ViewError::Redirect(Page::StudentDashboard))
        ));
    }

    #[test]
    fn test_flash_display_is_text() {
        assert_eq!(
            Flash::success("Login successful!").to_string(),
            "Login successful!"
        );
    }
}
