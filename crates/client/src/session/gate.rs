//! The session gate.
//!
//! Owns the session store and answers, for every page load, whether the
//! viewer may stay or where they should go instead.
//!
//! # Routing policy
//!
//! | session                  | landing page      |
//! |--------------------------|-------------------|
//! | none, partial or corrupt | entry page        |
//! | teacher                  | teacher dashboard |
//! | student                  | student dashboard |
//! | unrecognized role        | entry page        |
//!
//! The policy depends only on stored state, so evaluating it twice without
//! an intervening write yields the same answer, and the landing page always
//! evaluates to [`Decision::Allow`] for the session that produced it.

use classroom_core::{AccessToken, Role, Session};
use thiserror::Error;
use tracing::{debug, instrument};

use super::claims::{ClaimsError, TokenClaims};
use super::keys;
use super::store::{SessionStore, StoreError};
use crate::routing::{Decision, Page};

/// Errors that can occur when establishing a session from a raw token.
#[derive(Debug, Error)]
pub enum EstablishError {
    /// The token's claims could not be read. No session was established.
    #[error("invalid token: {0}")]
    Claims(#[from] ClaimsError),

    /// The session could not be written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Local session state plus the page-guard policy built on it.
#[derive(Debug)]
pub struct SessionGate<S> {
    store: S,
}

impl<S: SessionStore> SessionGate<S> {
    /// Create a gate over `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Take the underlying store back.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Store a session. All three fields are written in one store operation.
    ///
    /// The caller must already hold these values from a successful login.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a persistent store cannot be written.
    #[instrument(skip_all, fields(role = %role, subject = %subject))]
    pub fn establish(
        &mut self,
        token: &AccessToken,
        role: Role,
        subject: &str,
    ) -> Result<(), StoreError> {
        self.store.set_all(&[
            (keys::ACCESS_TOKEN, token.as_str()),
            (keys::USER_ROLE, role.as_str()),
            (keys::USERNAME, subject),
        ])?;
        debug!("Session established");
        Ok(())
    }

    /// Read role and subject from `token` and store the session.
    ///
    /// A token whose payload cannot be decoded, or whose role or subject
    /// claim is unusable, establishes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`EstablishError::Claims`] for an unusable token and
    /// [`EstablishError::Store`] if the store cannot be written.
    pub fn establish_from_token(&mut self, token: AccessToken) -> Result<Session, EstablishError> {
        let claims = TokenClaims::decode(token.as_str())?;
        let (role, subject) = claims.session_claims()?;
        self.establish(&token, role, subject)?;
        Ok(Session::new(token, role, subject))
    }

    /// The stored session, or `None` if any field is missing or the stored
    /// role is not recognized.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        let token = self.store.get(keys::ACCESS_TOKEN)?;
        let role = self.store.get(keys::USER_ROLE)?.parse::<Role>().ok()?;
        let subject = self.store.get(keys::USERNAME)?;
        Some(Session::new(AccessToken::new(token), role, subject))
    }

    /// Whether a token, a recognized role and a subject are all stored.
    ///
    /// A token and role without a subject do not count. This is presence,
    /// not validity: the token is never verified here.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// Where the current viewer belongs.
    #[must_use]
    pub fn landing(&self) -> Page {
        self.current()
            .map_or(Page::Entry, |session| Page::dashboard(session.role))
    }

    /// Guard for a page that requires `expected`.
    #[must_use]
    pub fn require_role(&self, expected: Role) -> Decision {
        let decision = match self.current() {
            Some(session) if session.role == expected => Decision::Allow,
            Some(session) => Decision::Redirect(Page::dashboard(session.role)),
            None => Decision::Redirect(Page::Entry),
        };
        debug!(expected = %expected, ?decision, "Role guard evaluated");
        decision
    }

    /// Guard for any page.
    ///
    /// Role pages defer to [`require_role`](Self::require_role). The entry
    /// page sends an authenticated viewer on to their dashboard.
    #[must_use]
    pub fn evaluate(&self, page: Page) -> Decision {
        match page.required_role() {
            Some(role) => self.require_role(role),
            None => match self.landing() {
                Page::Entry => Decision::Allow,
                dashboard => Decision::Redirect(dashboard),
            },
        }
    }

    /// Erase the session. Token, role and subject are removed together.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a persistent store cannot be written.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.remove_all(&keys::ALL)?;
        debug!("Session cleared");
        Ok(())
    }
}
