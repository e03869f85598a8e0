//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `LOPCAFE_API_URL` - Base URL of the LopCafe API (default: `http://localhost:5000`)
//! - `LOPCAFE_SESSION_FILE` - Path of the persisted session (default: `.lopcafe-session.json`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Local development API origin.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default session file, relative to the working directory.
pub const DEFAULT_SESSION_FILE: &str = ".lopcafe-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid API URL {0}: {1}")]
    InvalidUrl(String, String),
}

/// LopCafe client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every API path is appended to.
    pub api_url: Url,
    /// Where the file-backed session store keeps the token and role.
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Build a configuration for an explicit API URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `api_url` is not an absolute
    /// `http`/`https` URL.
    pub fn new(api_url: &str, session_file: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            session_file: session_file.into(),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `LOPCAFE_API_URL` is set but not a valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let raw_url = get_env_or_default("LOPCAFE_API_URL", DEFAULT_API_URL);
        let api_url = parse_api_url(&raw_url).map_err(|e| {
            ConfigError::InvalidEnvVar("LOPCAFE_API_URL".to_string(), e.to_string())
        })?;
        let session_file =
            PathBuf::from(get_env_or_default("LOPCAFE_SESSION_FILE", DEFAULT_SESSION_FILE));

        Ok(Self {
            api_url,
            session_file,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("Invalid default API URL"),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and check an API base URL.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidUrl(raw.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(
            raw.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(
            raw.to_string(),
            "URL must have a host".to_string(),
        ));
    }

    Ok(url)
}
