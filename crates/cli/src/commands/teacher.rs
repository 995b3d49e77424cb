//! Teacher dashboard commands.

use chrono::{DateTime, Utc};
use classroom_client::{FileStore, Portal};
use classroom_core::{AssignmentId, NewAssignment};

use crate::display;
use crate::error::CliError;

/// List the teacher's assignments.
pub async fn assignments(portal: &Portal<FileStore>) -> Result<(), CliError> {
    let assignments = portal.teacher_assignments().await?;
    display::emit(&display::teacher_assignments(&assignments));
    Ok(())
}

/// Create an assignment.
pub async fn create(
    portal: &Portal<FileStore>,
    title: String,
    description: String,
    due_date: DateTime<Utc>,
) -> Result<(), CliError> {
    let (flash, created) = portal
        .create_assignment(&NewAssignment {
            title,
            description,
            due_date,
        })
        .await?;
    display::flash(&flash);
    display::emit(&format!("Assignment ID: {}", created.id));
    Ok(())
}

/// List submissions for an assignment.
pub async fn submissions(
    portal: &Portal<FileStore>,
    assignment_id: &AssignmentId,
) -> Result<(), CliError> {
    let submissions = portal.view_submissions(assignment_id).await?;
    display::emit(&display::assignment_submissions(&submissions, portal.api()));
    Ok(())
}
