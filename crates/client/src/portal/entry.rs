//! Entry page: login, signup and logout.

use secrecy::SecretString;
use tracing::{info, instrument, warn};

use super::{FailureMessages, Flash, Portal, ViewError};
use crate::api::NewUser;
use crate::routing::Page;
use crate::session::{EstablishError, SessionStore};

const LOGIN: FailureMessages = FailureMessages {
    fallback: "Login failed.",
    transport: "An error occurred during login.",
};

const SIGNUP: FailureMessages = FailureMessages {
    fallback: "Signup failed.",
    transport: "An error occurred during signup.",
};

/// Where to go after an action, and what to tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub flash: Flash,
    pub to: Page,
}

impl<S: SessionStore> Portal<S> {
    /// Log in and establish a session from the issued token.
    ///
    /// On success the user is sent to their dashboard. A token whose payload
    /// cannot be read is treated as a failed login and nothing is stored.
    /// Only offered on the entry page, so a viewer who is already logged in
    /// must log out first.
    ///
    /// # Errors
    ///
    /// [`ViewError::Redirect`] to the viewer's dashboard if a session exists,
    /// [`ViewError::Message`] with the backend's `detail` (or a generic
    /// message) when login fails, [`ViewError::Storage`] if the session
    /// cannot be saved.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn login(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<Navigation, ViewError> {
        self.require_entry()?;
        let token = self
            .api
            .login(username, password)
            .await
            .map_err(|e| LOGIN.flash(&e))?;

        match self.gate.establish_from_token(token.access_token) {
            Ok(session) => info!(role = %session.role, "Logged in"),
            Err(EstablishError::Claims(e)) => {
                warn!(error = %e, "Backend issued an unreadable token");
                return Err(ViewError::Message(Flash::error(LOGIN.transport)));
            }
            Err(EstablishError::Store(e)) => return Err(e.into()),
        }

        Ok(Navigation {
            flash: Flash::success("Login successful!"),
            to: self.gate.landing(),
        })
    }

    /// Register an account. Does not log in.
    ///
    /// # Errors
    ///
    /// [`ViewError::Redirect`] to the viewer's dashboard if a session exists,
    /// otherwise [`ViewError::Message`] with the backend's `detail` (for
    /// example "Username already registered") or a generic message.
    #[instrument(skip_all, fields(username = %user.username, role = %user.role))]
    pub async fn signup(&self, user: &NewUser) -> Result<Flash, ViewError> {
        self.require_entry()?;
        self.api
            .signup(user)
            .await
            .map_err(|e| SIGNUP.flash(&e))?;
        info!("Account registered");
        Ok(Flash::success("Signup successful! You can now log in."))
    }

    /// Clear the session and return to the entry page.
    ///
    /// # Errors
    ///
    /// [`ViewError::Storage`] if a persistent store cannot be written.
    pub fn logout(&mut self) -> Result<Page, ViewError> {
        self.gate.clear()?;
        info!("Logged out");
        Ok(Page::Entry)
    }
}
