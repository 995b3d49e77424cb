//! Submission payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{AssignmentId, SubmissionId, UserId};

/// A submission as returned by the backend.
///
/// The teacher's per-assignment listing includes `student_username`; the
/// student's own listing does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub assignment_id: AssignmentId,
    pub student_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_username: Option<String>,
    pub submission_text: String,
    /// Server-relative path of an uploaded file, if one was attached.
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub grade: Option<i32>,
    #[serde(with = "super::timestamp")]
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// Whether a grade has been recorded.
    #[must_use]
    pub const fn is_graded(&self) -> bool {
        self.grade.is_some()
    }
}
