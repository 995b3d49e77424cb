//! Student dashboard commands.

use std::path::Path;

use classroom_client::api::{FileUpload, SubmissionUpload};
use classroom_client::{FileStore, Portal};
use classroom_core::AssignmentId;

use crate::display;
use crate::error::CliError;

/// List assignments open to students.
pub async fn assignments(portal: &Portal<FileStore>) -> Result<(), CliError> {
    let assignments = portal.student_assignments().await?;
    display::emit(&display::student_assignments(&assignments));
    Ok(())
}

/// List the student's own submissions.
pub async fn submissions(portal: &Portal<FileStore>) -> Result<(), CliError> {
    let submissions = portal.my_submissions().await?;
    display::emit(&display::my_submissions(&submissions, portal.api()));
    Ok(())
}

/// Submit work, optionally attaching a file.
pub async fn submit(
    portal: &Portal<FileStore>,
    assignment_id: &AssignmentId,
    text: String,
    file: Option<&Path>,
) -> Result<(), CliError> {
    let file = match file {
        Some(path) => Some(read_upload(path).await?),
        None => None,
    };

    let (flash, submission) = portal
        .submit_assignment(
            assignment_id,
            SubmissionUpload {
                submission_text: text,
                file,
            },
        )
        .await?;
    display::flash(&flash);
    display::emit(&format!("Submission ID: {}", submission.id));
    Ok(())
}

async fn read_upload(path: &Path) -> Result<FileUpload, CliError> {
    let contents = tokio::fs::read(path)
        .await
        .map_err(|source| CliError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_owned(), |n| n.to_string_lossy().into_owned());
    Ok(FileUpload {
        file_name,
        contents,
    })
}
