//! In-memory classroom backend.
//!
//! Mirrors the REST contract the client talks to: form login on `/token`,
//! JSON everywhere else, multipart submissions, `{"detail": ...}` error
//! bodies, and naive UTC timestamps. Tokens are unsigned JWTs carrying
//! `sub`, `role` and `exp`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, NaiveDateTime, Utc};
use classroom_client::{ClassroomClient, MemoryStore, Portal};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use url::Url;
use uuid::Uuid;

/// Error response in the backend's `{"detail": ...}` shape.
#[derive(Debug)]
struct DetailError(StatusCode, Value);

impl DetailError {
    fn new(status: StatusCode, detail: &str) -> Self {
        Self(status, Value::String(detail.to_owned()))
    }

    fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Could not validate credentials")
    }
}

impl IntoResponse for DetailError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "detail": self.1 }))).into_response()
    }
}

type Result<T> = std::result::Result<T, DetailError>;

#[derive(Debug, Clone)]
struct User {
    id: String,
    password: String,
    role: String,
}

#[derive(Debug, Clone)]
struct StoredAssignment {
    id: String,
    teacher_id: String,
    title: String,
    description: String,
    due_date: NaiveDateTime,
    created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
struct StoredSubmission {
    id: String,
    assignment_id: String,
    student_id: String,
    submission_text: String,
    file_path: Option<String>,
    grade: Option<i32>,
    submitted_at: NaiveDateTime,
}

/// A file received with a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Everything the backend knows, plus knobs for failure tests.
#[derive(Debug, Default)]
pub struct BackendState {
    users: HashMap<String, User>,
    tokens: HashMap<String, String>,
    assignments: Vec<StoredAssignment>,
    submissions: Vec<StoredSubmission>,
    /// Files keyed by the path reported in `file_path`.
    pub uploads: HashMap<String, Upload>,
    /// Issue this string instead of a real token on login.
    pub token_override: Option<String>,
    /// Requests seen, as `METHOD path`.
    pub requests: Vec<String>,
}

impl BackendState {
    /// Record a grade, as a teacher would through another client.
    pub fn grade_all(&mut self, grade: i32) {
        for submission in &mut self.submissions {
            submission.grade = Some(grade);
        }
    }
}

/// A running mock backend.
#[derive(Debug)]
pub struct MockBackend {
    api_url: Url,
    state: Arc<Mutex<BackendState>>,
}

impl MockBackend {
    /// Bind an ephemeral port and serve in the background.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the listener cannot be bound.
    pub async fn spawn() -> std::io::Result<Self> {
        let state = Arc::new(Mutex::new(BackendState::default()));
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let api_url = Url::parse(&format!("http://{addr}/api"))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let app = Router::new().nest("/api", api_routes()).with_state(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { api_url, state })
    }

    /// API root, e.g. `http://127.0.0.1:PORT/api`.
    #[must_use]
    pub const fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// A client pointed at this backend.
    #[must_use]
    pub fn client(&self) -> ClassroomClient {
        ClassroomClient::with_http_client(&self.api_url, reqwest::Client::new())
    }

    /// A portal with an empty in-memory session.
    #[must_use]
    pub fn portal(&self) -> Portal<MemoryStore> {
        Portal::new(MemoryStore::new(), self.client())
    }

    /// Shared backend state.
    #[must_use]
    pub fn state(&self) -> &Arc<Mutex<BackendState>> {
        &self.state
    }

    /// Register an account directly.
    pub async fn seed_user(&self, username: &str, password: &str, role: &str) {
        self.state.lock().await.users.insert(
            username.to_owned(),
            User {
                id: Uuid::new_v4().to_string(),
                password: password.to_owned(),
                role: role.to_owned(),
            },
        );
    }

    /// Requests received so far.
    pub async fn requests(&self) -> Vec<String> {
        self.state.lock().await.requests.clone()
    }
}

type Shared = Arc<Mutex<BackendState>>;

fn api_routes() -> Router<Shared> {
    Router::new()
        .route("/token", post(login))
        .route("/signup", post(signup))
        .route("/assignments", post(create_assignment))
        .route("/teacher/assignments", get(teacher_assignments))
        .route("/assignments/{id}/submissions", get(assignment_submissions))
        .route("/assignments/{id}/submit", post(submit_assignment))
        .route("/student/assignments", get(student_assignments))
        .route("/student/submissions", get(student_submissions))
}

// =============================================================================
// Token handling
// =============================================================================

fn issue_token(username: &str, role: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let exp = (Utc::now() + Duration::minutes(30)).timestamp();
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "sub": username, "role": role, "exp": exp }).to_string(),
    );
    format!("{header}.{payload}.{}", Uuid::new_v4().simple())
}

/// Resolve the bearer token to its user.
fn authenticate(state: &BackendState, headers: &HeaderMap) -> Result<User> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(DetailError::unauthorized)?;
    let username = state.tokens.get(token).ok_or_else(DetailError::unauthorized)?;
    state
        .users
        .get(username)
        .cloned()
        .ok_or_else(DetailError::unauthorized)
}

fn require(user: &User, role: &str) -> Result<()> {
    if user.role == role {
        return Ok(());
    }
    let who = if role == "teacher" { "teachers" } else { "students" };
    Err(DetailError::new(
        StatusCode::FORBIDDEN,
        &format!("Operation forbidden: Only {who} can perform this action"),
    ))
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn naive(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

fn assignment_json(a: &StoredAssignment) -> Value {
    json!({
        "id": a.id,
        "title": a.title,
        "description": a.description,
        "due_date": naive(a.due_date),
        "created_at": naive(a.created_at),
        "teacher_id": a.teacher_id,
    })
}

fn submission_json(s: &StoredSubmission, username: Option<&str>) -> Value {
    let mut value = json!({
        "id": s.id,
        "assignment_id": s.assignment_id,
        "student_id": s.student_id,
        "submission_text": s.submission_text,
        "file_path": s.file_path,
        "grade": s.grade,
        "submitted_at": naive(s.submitted_at),
    });
    if let (Some(name), Some(obj)) = (username, value.as_object_mut()) {
        obj.insert("student_username".to_owned(), Value::String(name.to_owned()));
    }
    value
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(state): State<Shared>, Form(form): Form<LoginForm>) -> Result<Json<Value>> {
    let mut state = state.lock().await;
    state.requests.push("POST /token".to_owned());

    let user = state
        .users
        .get(&form.username)
        .filter(|u| u.password == form.password)
        .cloned()
        .ok_or_else(|| {
            DetailError::new(StatusCode::UNAUTHORIZED, "Incorrect username or password")
        })?;

    let token = state
        .token_override
        .clone()
        .unwrap_or_else(|| issue_token(&form.username, &user.role));
    state.tokens.insert(token.clone(), form.username);
    Ok(Json(json!({ "access_token": token, "token_type": "bearer" })))
}

#[derive(Deserialize)]
struct SignupRequest {
    username: String,
    password: String,
    role: String,
}

async fn signup(
    State(state): State<Shared>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<Value>> {
    let mut state = state.lock().await;
    state.requests.push("POST /signup".to_owned());

    if state.users.contains_key(&req.username) {
        return Err(DetailError::new(
            StatusCode::BAD_REQUEST,
            "Username already registered",
        ));
    }
    if !matches!(req.role.as_str(), "teacher" | "student") {
        return Err(DetailError(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!([{ "loc": ["body", "role"], "msg": "Input should be 'teacher' or 'student'" }]),
        ));
    }

    let id = Uuid::new_v4().to_string();
    state.users.insert(
        req.username.clone(),
        User {
            id: id.clone(),
            password: req.password,
            role: req.role.clone(),
        },
    );
    Ok(Json(json!({ "id": id, "username": req.username, "role": req.role })))
}

#[derive(Deserialize)]
struct AssignmentRequest {
    title: String,
    description: String,
    due_date: String,
}

async fn create_assignment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<AssignmentRequest>,
) -> Result<Json<Value>> {
    let mut state = state.lock().await;
    state.requests.push("POST /assignments".to_owned());
    let user = authenticate(&state, &headers)?;
    require(&user, "teacher")?;

    let due_date = chrono::DateTime::parse_from_rfc3339(&req.due_date)
        .map(|dt| dt.naive_utc())
        .map_err(|_| {
            DetailError(
                StatusCode::UNPROCESSABLE_ENTITY,
                json!([{ "loc": ["body", "due_date"], "msg": "Input should be a valid datetime" }]),
            )
        })?;

    let assignment = StoredAssignment {
        id: Uuid::new_v4().to_string(),
        teacher_id: user.id,
        title: req.title,
        description: req.description,
        due_date,
        created_at: now(),
    };
    let body = assignment_json(&assignment);
    state.assignments.push(assignment);
    Ok(Json(body))
}

async fn teacher_assignments(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>> {
    let mut state = state.lock().await;
    state.requests.push("GET /teacher/assignments".to_owned());
    let user = authenticate(&state, &headers)?;
    require(&user, "teacher")?;

    let list: Vec<Value> = state
        .assignments
        .iter()
        .filter(|a| a.teacher_id == user.id)
        .map(assignment_json)
        .collect();
    Ok(Json(Value::Array(list)))
}

async fn assignment_submissions(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>> {
    let mut state = state.lock().await;
    state
        .requests
        .push(format!("GET /assignments/{id}/submissions"));
    let user = authenticate(&state, &headers)?;
    require(&user, "teacher")?;

    let assignment = state
        .assignments
        .iter()
        .find(|a| a.id == id)
        .ok_or_else(|| DetailError::new(StatusCode::NOT_FOUND, "Assignment not found"))?;
    if assignment.teacher_id != user.id {
        return Err(DetailError::new(
            StatusCode::FORBIDDEN,
            "You are not authorized to view submissions for this assignment",
        ));
    }

    let usernames: HashMap<&str, &str> = state
        .users
        .iter()
        .map(|(name, u)| (u.id.as_str(), name.as_str()))
        .collect();
    let list: Vec<Value> = state
        .submissions
        .iter()
        .filter(|s| s.assignment_id == id)
        .map(|s| submission_json(s, usernames.get(s.student_id.as_str()).copied()))
        .collect();
    Ok(Json(Value::Array(list)))
}

async fn submit_assignment(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>> {
    let malformed = |_| DetailError::new(StatusCode::BAD_REQUEST, "Malformed upload");

    let mut text = None;
    let mut file = None;
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("submission_text") => text = Some(field.text().await.map_err(malformed)?),
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_owned();
                let contents = field.bytes().await.map_err(malformed)?.to_vec();
                file = Some(Upload {
                    file_name,
                    contents,
                });
            }
            _ => {}
        }
    }

    let mut state = state.lock().await;
    state.requests.push(format!("POST /assignments/{id}/submit"));
    let user = authenticate(&state, &headers)?;
    require(&user, "student")?;

    let submission_text = text.ok_or_else(|| {
        DetailError(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!([{ "loc": ["body", "submission_text"], "msg": "Field required" }]),
        )
    })?;
    if !state.assignments.iter().any(|a| a.id == id) {
        return Err(DetailError::new(StatusCode::NOT_FOUND, "Assignment not found"));
    }
    if state
        .submissions
        .iter()
        .any(|s| s.assignment_id == id && s.student_id == user.id)
    {
        return Err(DetailError::new(
            StatusCode::BAD_REQUEST,
            "You have already submitted this assignment.",
        ));
    }

    let submitted_at = now();
    let file_path = file.map(|upload| {
        let ext = upload
            .file_name
            .rsplit_once('.')
            .map_or_else(String::new, |(_, ext)| format!(".{ext}"));
        let path = format!(
            "uploaded_files/{}_{id}_{}{ext}",
            user.id,
            submitted_at.format("%Y%m%d%H%M%S")
        );
        state.uploads.insert(path.clone(), upload);
        path
    });

    let submission = StoredSubmission {
        id: Uuid::new_v4().to_string(),
        assignment_id: id,
        student_id: user.id,
        submission_text,
        file_path,
        grade: None,
        submitted_at,
    };
    let body = submission_json(&submission, None);
    state.submissions.push(submission);
    Ok(Json(body))
}

async fn student_assignments(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>> {
    let mut state = state.lock().await;
    state.requests.push("GET /student/assignments".to_owned());
    let user = authenticate(&state, &headers)?;
    require(&user, "student")?;

    let list: Vec<Value> = state.assignments.iter().map(assignment_json).collect();
    Ok(Json(Value::Array(list)))
}

async fn student_submissions(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>> {
    let mut state = state.lock().await;
    state.requests.push("GET /student/submissions".to_owned());
    let user = authenticate(&state, &headers)?;
    require(&user, "student")?;

    let list: Vec<Value> = state
        .submissions
        .iter()
        .filter(|s| s.student_id == user.id)
        .map(|s| submission_json(s, None))
        .collect();
    Ok(Json(Value::Array(list)))
}
