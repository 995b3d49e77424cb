//! Terminal rendering of dashboards and messages.

use std::borrow::Cow;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use classroom_client::{ClassroomClient, Flash};
use classroom_core::{Assignment, Submission};
use thiserror::Error;

use crate::error::CliError;

/// Characters of an assignment description shown in the student listing.
const DESCRIPTION_PREVIEW: usize = 100;
/// Characters of a submission id shown in the student's own listing.
const ID_PREVIEW: usize = 8;
/// Characters of submission text shown in the student's own listing.
const TEXT_PREVIEW: usize = 150;

/// Print a block of output.
#[allow(clippy::print_stdout)]
pub fn emit(text: &str) {
    println!("{text}");
}

/// Print a success message.
pub fn flash(flash: &Flash) {
    emit(&flash.text);
}

/// Print the error that ended a command.
#[allow(clippy::print_stderr)]
pub fn report(err: &CliError) {
    if let CliError::Redirect { page, .. } = err {
        tracing::debug!(%page, "Command redirected");
    }
    eprintln!("{err}");
}

/// Keep at most `max_chars` characters, marking a cut with `...`.
fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}...", text.get(..cut).unwrap_or(text))),
        None => Cow::Borrowed(text),
    }
}

fn local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Rejected `--due` value.
#[derive(Debug, Error)]
#[error("expected RFC 3339 or YYYY-MM-DDTHH:MM, got {0:?}")]
pub struct InvalidDueDate(String);

/// Parse a due date: RFC 3339, or `YYYY-MM-DDTHH:MM` in local time.
pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>, InvalidDueDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M")
        .ok()
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| InvalidDueDate(input.to_owned()))
}

/// Teacher's own assignments.
pub fn teacher_assignments(assignments: &[Assignment]) -> String {
    if assignments.is_empty() {
        return "No assignments created yet.".to_owned();
    }

    let blocks: Vec<String> = assignments
        .iter()
        .map(|a| {
            format!(
                "{}  [{}]\n  Due: {}\n  Created: {}",
                a.title,
                a.id,
                local_time(a.due_date),
                local_time(a.created_at)
            )
        })
        .collect();
    blocks.join("\n\n")
}

/// Submissions for one assignment, as the teacher sees them.
pub fn assignment_submissions(submissions: &[Submission], api: &ClassroomClient) -> String {
    if submissions.is_empty() {
        return "No submissions for this assignment yet.".to_owned();
    }

    let blocks: Vec<String> = submissions
        .iter()
        .map(|s| {
            let student = s
                .student_username
                .as_deref()
                .unwrap_or_else(|| s.student_id.as_str());
            let mut block = format!(
                "Student: {student}\n  Submitted: {}\n  {}",
                local_time(s.submitted_at),
                s.submission_text
            );
            if let Some(path) = &s.file_path {
                block.push_str(&format!("\n  File: {}", api.file_url(path)));
            }
            if let Some(grade) = s.grade {
                block.push_str(&format!("\n  Grade: {grade}"));
            }
            block
        })
        .collect();
    blocks.join("\n\n")
}

/// Assignments open to students.
pub fn student_assignments(assignments: &[Assignment]) -> String {
    if assignments.is_empty() {
        return "No assignments available.".to_owned();
    }

    let blocks: Vec<String> = assignments
        .iter()
        .map(|a| {
            format!(
                "{}  [{}]\n  Due: {}\n  Description: {}",
                a.title,
                a.id,
                local_time(a.due_date),
                truncate(&a.description, DESCRIPTION_PREVIEW)
            )
        })
        .collect();
    blocks.join("\n\n")
}

/// The student's own submissions.
pub fn my_submissions(submissions: &[Submission], api: &ClassroomClient) -> String {
    if submissions.is_empty() {
        return "You have no submissions yet.".to_owned();
    }

    let blocks: Vec<String> = submissions
        .iter()
        .map(|s| {
            let mut block = format!(
                "Submission ID: {}\n  Submitted: {}\n  {}",
                truncate(s.id.as_str(), ID_PREVIEW),
                local_time(s.submitted_at),
                truncate(&s.submission_text, TEXT_PREVIEW)
            );
            if let Some(path) = &s.file_path {
                block.push_str(&format!("\n  File: {}", api.file_url(path)));
            }
            match s.grade {
                Some(grade) => block.push_str(&format!("\n  Grade: {grade}")),
                None => block.push_str("\n  Grade: Not Graded Yet"),
            }
            block
        })
        .collect();
    blocks.join("\n\n")
}
