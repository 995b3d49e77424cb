//! Student dashboard.

use classroom_core::{Assignment, AssignmentId, Role, Submission};
use tracing::{info, instrument};

use super::teacher::LIST_ASSIGNMENTS;
use super::{FailureMessages, Flash, Portal, ViewError};
use crate::api::SubmissionUpload;
use crate::session::SessionStore;

const SUBMIT: FailureMessages = FailureMessages {
    fallback: "Failed to submit assignment.",
    transport: "An error occurred during submission.",
};

const MY_SUBMISSIONS: FailureMessages = FailureMessages {
    fallback: "Failed to load your submissions.",
    transport: "An error occurred while loading your submissions.",
};

impl<S: SessionStore> Portal<S> {
    /// Assignments open to students.
    ///
    /// # Errors
    ///
    /// [`ViewError::Redirect`] if the viewer is not a student, otherwise
    /// [`ViewError::Message`] when loading fails.
    pub async fn student_assignments(&self) -> Result<Vec<Assignment>, ViewError> {
        let session = self.authorize(Role::Student)?;
        self.api
            .student_assignments(&session.token)
            .await
            .map_err(|e| LIST_ASSIGNMENTS.flash(&e))
    }

    /// The student's own submissions.
    ///
    /// # Errors
    ///
    /// [`ViewError::Redirect`] if the viewer is not a student, otherwise
    /// [`ViewError::Message`] when loading fails.
    pub async fn my_submissions(&self) -> Result<Vec<Submission>, ViewError> {
        let session = self.authorize(Role::Student)?;
        self.api
            .student_submissions(&session.token)
            .await
            .map_err(|e| MY_SUBMISSIONS.flash(&e))
    }

    /// Submit work for an assignment, with an optional file.
    ///
    /// # Errors
    ///
    /// [`ViewError::Redirect`] if the viewer is not a student, otherwise
    /// [`ViewError::Message`] (for example "You have already submitted this
    /// assignment.").
    #[instrument(skip_all, fields(assignment_id = %assignment_id))]
    pub async fn submit_assignment(
        &self,
        assignment_id: &AssignmentId,
        upload: SubmissionUpload,
    ) -> Result<(Flash, Submission), ViewError> {
        let session = self.authorize(Role::Student)?;
        let submission = self
            .api
            .submit_assignment(&session.token, assignment_id, upload)
            .await
            .map_err(|e| SUBMIT.flash(&e))?;
        info!(submission_id = %submission.id, "Assignment submitted");
        Ok((Flash::success("Assignment submitted successfully!"), submission))
    }
}
