//! Assignment payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{AssignmentId, UserId};

/// An assignment as returned by the backend.
///
/// Read-only on the client: it is rendered, never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    pub description: String,
    #[serde(with = "super::timestamp")]
    pub due_date: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    /// Owning teacher. Older backends omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<UserId>,
}

/// Request body for creating an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssignment {
    pub title: String,
    pub description: String,
    /// Sent as an ISO-8601 UTC string.
    #[serde(with = "super::timestamp")]
    pub due_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_from_backend_json() {
        let json = r#"{
            "title": "Essay on photosynthesis",
            "description": "Two pages.",
            "due_date": "2025-08-01T23:59:00",
            "id": "a1",
            "created_at": "2025-07-01T10:00:00.123456",
            "teacher_id": "t1"
        }"#;
        let assignment: Assignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.id.as_str(), "a1");
        assert_eq!(assignment.teacher_id, Some(UserId::new("t1")));
        assert!(assignment.created_at < assignment.due_date);
    }

    #[test]
    fn test_assignment_without_teacher_id() {
        let json = r#"{"id":"a2","title":"t","description":"d",
            "due_date":"2025-08-01T00:00:00Z","created_at":"2025-07-01T00:00:00Z"}"#;
        let assignment: Assignment = serde_json::from_str(json).unwrap();
        assert!(assignment.teacher_id.is_none());
    }

    #[test]
    fn test_new_assignment_serializes_utc_due_date() {
        let body = NewAssignment {
            title: "Quiz".to_string(),
            description: "Chapter 3".to_string(),
            due_date: crate::timestamp::parse("2025-08-01T23:59:00").unwrap(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["due_date"], "2025-08-01T23:59:00Z");
        assert_eq!(value["title"], "Quiz");
    }
}
