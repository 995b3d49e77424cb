//! Classroom REST API client.
//!
//! Provides access to the assignment and submission endpoints. Every
//! endpoint except login and signup needs the caller's access token; the
//! client does not hold one itself, so the session stays owned by the gate.

use std::sync::Arc;

use classroom_core::{AccessToken, Assignment, AssignmentId, NewAssignment, Submission};
use reqwest::multipart::{Form, Part};
use secrecy::SecretString;
use serde::{Serialize, de::DeserializeOwned};
use tracing::instrument;
use url::Url;

use super::auth::{self, NewUser, RegisteredUser, TokenResponse};
use super::{ApiError, ensure_success};

/// Classroom REST API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ClassroomClient {
    inner: Arc<ClassroomClientInner>,
}

struct ClassroomClientInner {
    client: reqwest::Client,
    /// Base URL without a trailing slash, e.g. `http://127.0.0.1:8000/api`.
    base_url: String,
}

impl std::fmt::Debug for ClassroomClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassroomClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

/// A file attached to a submission.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// File name reported to the backend (its extension is kept server-side).
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Body of a submission.
#[derive(Debug, Clone)]
pub struct SubmissionUpload {
    pub submission_text: String,
    pub file: Option<FileUpload>,
}

impl ClassroomClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built
    /// (for example, TLS initialisation fails).
    pub fn new(base_url: &Url) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_http_client(base_url, client))
    }

    /// Create a client that reuses an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http_client(base_url: &Url, client: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(ClassroomClientInner {
                client,
                base_url: base_url.as_str().trim_end_matches('/').to_owned(),
            }),
        }
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Link to a file uploaded with a submission.
    ///
    /// Uploaded files are served from the server root, outside the `/api`
    /// prefix.
    #[must_use]
    pub fn file_url(&self, file_path: &str) -> String {
        let root = self
            .inner
            .base_url
            .strip_suffix("/api")
            .unwrap_or(&self.inner.base_url);
        format!("{root}/{}", file_path.trim_start_matches('/'))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchange credentials for an access token.
    ///
    /// # Errors
    ///
    /// See [`auth::login`].
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<TokenResponse, ApiError> {
        auth::login(&self.inner.client, &self.inner.base_url, username, password).await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// See [`auth::signup`].
    pub async fn signup(&self, user: &NewUser) -> Result<RegisteredUser, ApiError> {
        auth::signup(&self.inner.client, &self.inner.base_url, user).await
    }

    // =========================================================================
    // Teacher endpoints
    // =========================================================================

    /// Create an assignment owned by the token's teacher.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] if the backend refuses (403 for
    /// non-teachers) and [`ApiError::Transport`] on network failure.
    #[instrument(skip_all, fields(title = %assignment.title))]
    pub async fn create_assignment(
        &self,
        token: &AccessToken,
        assignment: &NewAssignment,
    ) -> Result<Assignment, ApiError> {
        self.post_json(token, "/assignments", assignment).await
    }

    /// Assignments created by the token's teacher.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on backend refusal or network failure.
    #[instrument(skip_all)]
    pub async fn teacher_assignments(&self, token: &AccessToken) -> Result<Vec<Assignment>, ApiError> {
        self.get_json(token, "/teacher/assignments").await
    }

    /// Submissions for one of the teacher's assignments.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] with 404 for an unknown assignment and
    /// 403 for someone else's.
    #[instrument(skip_all, fields(assignment_id = %assignment_id))]
    pub async fn assignment_submissions(
        &self,
        token: &AccessToken,
        assignment_id: &AssignmentId,
    ) -> Result<Vec<Submission>, ApiError> {
        self.get_json(token, &format!("/assignments/{assignment_id}/submissions"))
            .await
    }

    // =========================================================================
    // Student endpoints
    // =========================================================================

    /// Assignments visible to students.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on backend refusal or network failure.
    #[instrument(skip_all)]
    pub async fn student_assignments(&self, token: &AccessToken) -> Result<Vec<Assignment>, ApiError> {
        self.get_json(token, "/student/assignments").await
    }

    /// The token student's own submissions.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on backend refusal or network failure.
    #[instrument(skip_all)]
    pub async fn student_submissions(&self, token: &AccessToken) -> Result<Vec<Submission>, ApiError> {
        self.get_json(token, "/student/submissions").await
    }

    /// Submit work for an assignment as multipart form data.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] if the assignment is unknown or was
    /// already submitted, and [`ApiError::Transport`] on network failure.
    #[instrument(
        skip_all,
        fields(assignment_id = %assignment_id, has_file = upload.file.is_some())
    )]
    pub async fn submit_assignment(
        &self,
        token: &AccessToken,
        assignment_id: &AssignmentId,
        upload: SubmissionUpload,
    ) -> Result<Submission, ApiError> {
        let mut form = Form::new().text("submission_text", upload.submission_text);
        if let Some(file) = upload.file {
            form = form.part("file", Part::bytes(file.contents).file_name(file.file_name));
        }

        let response = self
            .inner
            .client
            .post(self.endpoint(&format!("/assignments/{assignment_id}/submit")))
            .bearer_auth(token.as_str())
            .multipart(form)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    // =========================================================================
    // Request helpers
    // =========================================================================

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .get(self.endpoint(path))
            .bearer_auth(token.as_str())
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint(path))
            .bearer_auth(token.as_str())
            .json(body)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }
}
