//! Login and signup.
//!
//! Login posts form-encoded credentials to `/token` and receives a JWT.
//! Signup posts JSON to `/signup`.

use classroom_core::{AccessToken, Role, UserId};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiError, ensure_success};

/// Successful `/token` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// JWT access token.
    pub access_token: AccessToken,
    /// Token type, `bearer` in practice.
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Signup request.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: SecretString,
    pub role: Role,
}

/// Account record returned by `/signup`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredUser {
    pub id: UserId,
    pub username: String,
    /// Role as stored by the backend. Kept as text since the client never
    /// routes on it.
    pub role: String,
}

#[derive(Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    username: &'a str,
    password: &'a str,
    role: Role,
}

/// Exchange a username and password for an access token.
///
/// # Errors
///
/// Returns [`ApiError::Backend`] if the credentials are rejected and
/// [`ApiError::Transport`] if the request does not complete.
#[instrument(skip_all, fields(username = %username))]
pub async fn login(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    password: &SecretString,
) -> Result<TokenResponse, ApiError> {
    let response = client
        .post(format!("{base_url}/token"))
        .form(&LoginForm {
            username,
            password: password.expose_secret(),
        })
        .send()
        .await?;

    let response = ensure_success(response).await?;
    Ok(response.json().await?)
}

/// Register a new account.
///
/// # Errors
///
/// Returns [`ApiError::Backend`] if the backend refuses the account (for
/// example, a taken username) and [`ApiError::Transport`] if the request
/// does not complete.
#[instrument(skip_all, fields(username = %user.username, role = %user.role))]
pub async fn signup(
    client: &reqwest::Client,
    base_url: &str,
    user: &NewUser,
) -> Result<RegisteredUser, ApiError> {
    let response = client
        .post(format!("{base_url}/signup"))
        .json(&SignupRequest {
            username: &user.username,
            password: user.password.expose_secret(),
            role: user.role,
        })
        .send()
        .await?;

    let response = ensure_success(response).await?;
    Ok(response.json().await?)
}
