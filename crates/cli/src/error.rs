//! CLI errors.

use std::path::PathBuf;

use classroom_client::{ApiError, ConfigError, Flash, Page, StoreError, ViewError};
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    /// An action failed with a message for the user.
    #[error("{0}")]
    Flash(Flash),

    /// The command belongs to a page the viewer may not open.
    #[error("{hint}")]
    Redirect { page: Page, hint: &'static str },

    #[error("Could not read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<ViewError> for CliError {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::Redirect(page) => Self::Redirect {
                page,
                hint: redirect_hint(page),
            },
            ViewError::Message(flash) => Self::Flash(flash),
            ViewError::Storage(e) => Self::Storage(e),
        }
    }
}

const fn redirect_hint(page: Page) -> &'static str {
    match page {
        Page::Entry => "Not logged in. Run `classroom login` first.",
        Page::TeacherDashboard => {
            "Not available while logged in as a teacher. Your commands are under \
             `classroom teacher`; run `classroom logout` to switch accounts."
        }
        Page::StudentDashboard => {
            "Not available while logged in as a student. Your commands are under \
             `classroom student`; run `classroom logout` to switch accounts."
        }
    }
}
