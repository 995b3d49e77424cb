//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CLASSROOM_API_BASE_URL` - Backend API root (default: `http://127.0.0.1:8000/api`)
//! - `CLASSROOM_SESSION_FILE` - Where the session is persisted
//!   (default: `$HOME/.classroom/session.json`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default backend API root.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Session file location relative to the home directory.
const DEFAULT_SESSION_FILE: &str = ".classroom/session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Classroom client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API root, e.g. `http://127.0.0.1:8000/api`
    pub api_base_url: Url,
    /// File the session store persists to
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Build a configuration from explicit values.
    #[must_use]
    pub const fn new(api_base_url: Url, session_file: PathBuf) -> Self {
        Self {
            api_base_url,
            session_file,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if the API URL is not an
    /// absolute `http(s)` URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_api_url(
            "CLASSROOM_API_BASE_URL",
            &get_env_or_default("CLASSROOM_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;

        let session_file = get_optional_env("CLASSROOM_SESSION_FILE")
            .map_or_else(default_session_file, PathBuf::from);

        Ok(Self {
            api_base_url,
            session_file,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Validate an API root URL.
fn parse_api_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme {}", url.scheme()),
        ));
    }

    Ok(url)
}

fn default_session_file() -> PathBuf {
    get_optional_env("HOME").map_or_else(
        || PathBuf::from(DEFAULT_SESSION_FILE),
        |home| PathBuf::from(home).join(DEFAULT_SESSION_FILE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_url_default() {
        let url = parse_api_url("TEST_VAR", DEFAULT_API_BASE_URL).unwrap();
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert_eq!(url.port(), Some(8000));
        assert_eq!(url.path(), "/api");
    }

    #[test]
    fn test_parse_api_url_rejects_relative() {
        let result = parse_api_url("TEST_VAR", "/api");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_parse_api_url_rejects_other_schemes() {
        let err = parse_api_url("TEST_VAR", "ftp://example.com/api").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme ftp"));
    }

    #[test]
    fn test_default_session_file_ends_with_relative_path() {
        assert!(default_session_file().ends_with(DEFAULT_SESSION_FILE));
    }
}
