//! Session types.
//!
//! The local "currently logged in as" state: an access token together with
//! the role and subject claimed by it.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Opaque bearer credential issued by the backend.
///
/// The client never verifies it. `Debug` output is redacted so the token does
/// not end up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the raw token, e.g. for an `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// An established session.
///
/// Token, role and subject always travel together: a session is never built
/// from a subset of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token sent with authenticated requests.
    pub token: AccessToken,
    /// Role claimed by the token, used for routing only.
    pub role: Role,
    /// Subject claimed by the token (the username).
    pub subject: String,
}

impl Session {
    /// Create a session from its three parts.
    #[must_use]
    pub fn new(token: AccessToken, role: Role, subject: impl Into<String>) -> Self {
        Self {
            token,
            role,
            subject: subject.into(),
        }
    }
}
