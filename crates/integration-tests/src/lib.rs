//! Integration tests for the classroom portal client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p classroom-integration-tests
//! ```
//!
//! No external services are needed. Each test starts a [`MockBackend`] on an
//! ephemeral port: an axum app that speaks the classroom REST API under
//! `/api` and keeps its data in memory.
//!
//! # Test Categories
//!
//! - `entry_flow` - signup, login, logout and routing
//! - `teacher_flow` - assignment creation and submission review
//! - `student_flow` - listing and submitting assignments
//! - `failures` - backend refusals, transport failures, malformed tokens

pub mod backend;

pub use backend::{BackendState, MockBackend, Upload};
