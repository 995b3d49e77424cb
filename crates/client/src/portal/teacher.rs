//! Teacher dashboard.

use classroom_core::{Assignment, AssignmentId, NewAssignment, Role, Submission};
use tracing::{info, instrument};

use super::{FailureMessages, Flash, Portal, ViewError};
use crate::session::SessionStore;

const CREATE: FailureMessages = FailureMessages {
    fallback: "Failed to create assignment.",
    transport: "An error occurred.",
};

pub(super) const LIST_ASSIGNMENTS: FailureMessages = FailureMessages {
    fallback: "Failed to load assignments.",
    transport: "An error occurred while loading assignments.",
};

const LIST_SUBMISSIONS: FailureMessages = FailureMessages {
    fallback: "Failed to load submissions.",
    transport: "An error occurred while loading submissions.",
};

impl<S: SessionStore> Portal<S> {
    /// Create an assignment.
    ///
    /// # Errors
    ///
    /// [`ViewError::Redirect`] if the viewer is not a teacher, otherwise
    /// [`ViewError::Message`] when the backend refuses.
    #[instrument(skip_all, fields(title = %assignment.title))]
    pub async fn create_assignment(
        &self,
        assignment: &NewAssignment,
    ) -> Result<(Flash, Assignment), ViewError> {
        let session = self.authorize(Role::Teacher)?;
        let created = self
            .api
            .create_assignment(&session.token, assignment)
            .await
            .map_err(|e| CREATE.flash(&e))?;
        info!(assignment_id = %created.id, "Assignment created");
        Ok((Flash::success("Assignment created successfully!"), created))
    }

    /// Assignments the teacher has created.
    ///
    /// # Errors
    ///
    /// [`ViewError::Redirect`] if the viewer is not a teacher, otherwise
    /// [`ViewError::Message`] when loading fails.
    pub async fn teacher_assignments(&self) -> Result<Vec<Assignment>, ViewError> {
        let session = self.authorize(Role::Teacher)?;
        self.api
            .teacher_assignments(&session.token)
            .await
            .map_err(|e| LIST_ASSIGNMENTS.flash(&e))
    }

    /// Submissions for one of the teacher's assignments.
    ///
    /// # Errors
    ///
    /// [`ViewError::Redirect`] if the viewer is not a teacher, otherwise
    /// [`ViewError::Message`] (for example "Assignment not found").
    pub async fn view_submissions(
        &self,
        assignment_id: &AssignmentId,
    ) -> Result<Vec<Submission>, ViewError> {
        let session = self.authorize(Role::Teacher)?;
        self.api
            .assignment_submissions(&session.token, assignment_id)
            .await
            .map_err(|e| LIST_SUBMISSIONS.flash(&e))
    }
}
