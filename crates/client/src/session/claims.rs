//! Token claim extraction.
//!
//! Access tokens are JWTs (`header.payload.signature`). The payload segment
//! is read as data to learn the role and subject for routing. The signature
//! is never checked: the client does not hold the signing key, and nothing
//! decided here is a security decision.

use base64::{Engine, engine::general_purpose::STANDARD_NO_PAD};
use chrono::{DateTime, Utc};
use classroom_core::Role;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while reading claims from a token.
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// The token does not have three dot-separated segments.
    #[error("token is not a three-segment JWT")]
    Malformed,

    /// The payload segment is not valid base64.
    #[error("token payload is not base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The payload is not a JSON claims object.
    #[error("token payload is not a claims object: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload has no `sub` claim.
    #[error("token has no subject claim")]
    MissingSubject,

    /// The `role` claim is missing or not a known role.
    #[error("token role claim is not recognized: {0:?}")]
    UnrecognizedRole(Option<String>),
}

/// Claims carried in a token payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Subject (the username).
    #[serde(default)]
    pub sub: Option<String>,
    /// Role as issued by the backend.
    #[serde(default)]
    pub role: Option<String>,
    /// Expiry as a Unix timestamp.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Decode the payload segment of `token`.
    ///
    /// Accepts both base64url and standard alphabets, with or without `=`
    /// padding.
    ///
    /// # Errors
    ///
    /// Returns a [`ClaimsError`] if the token is not three segments or the
    /// payload is not base64-encoded JSON.
    pub fn decode(token: &str) -> Result<Self, ClaimsError> {
        let mut segments = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(ClaimsError::Malformed);
        };

        let normalized: String = payload
            .trim_end_matches('=')
            .chars()
            .map(|c| match c {
                '-' => '+',
                '_' => '/',
                other => other,
            })
            .collect();

        let bytes = STANDARD_NO_PAD.decode(normalized)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// The role claim, if it names a known role.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }

    /// Expiry as a timestamp, if present and representable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Extract the `(role, subject)` pair needed to establish a session.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::UnrecognizedRole`] or
    /// [`ClaimsError::MissingSubject`] if either claim is unusable.
    pub fn session_claims(&self) -> Result<(Role, &str), ClaimsError> {
        let role = self
            .role()
            .ok_or_else(|| ClaimsError::UnrecognizedRole(self.role.clone()))?;
        let subject = self.sub.as_deref().ok_or(ClaimsError::MissingSubject)?;
        Ok((role, subject))
    }
}
