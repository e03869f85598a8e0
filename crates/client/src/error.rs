//! Error types for the LopCafe API client.

use lopcafe_core::ParseIdError;
use serde_json::Value;
use thiserror::Error;

use crate::config::ConfigError;
use crate::session::SessionError;

/// Errors surfaced by [`ApiClient`](crate::ApiClient) operations.
///
/// `Validation` and `AuthRequired` are raised before any request is sent.
/// `Http`, `Network` and `Parse` describe what happened on the wire.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A local precondition failed; no request was made.
    #[error("{0}")]
    Validation(String),

    /// The operation needs a token and the session has none; no request was made.
    #[error("Authentication required")]
    AuthRequired,

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or `HTTP error <status>`.
        message: String,
        /// Parsed error body (synthesized when the body was not JSON).
        body: Option<Value>,
    },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// A successful response carried a body that was not the expected JSON.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Reading or writing the session failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The client could not be configured.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// HTTP status, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw error body, when a response was received.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Whether the caller should send the user to the login screen.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::AuthRequired | Self::Http { status: 401, .. })
    }

    /// Build an `Http` error from a status and optional JSON body.
    ///
    /// The message is the body's `message` field when it is a string,
    /// otherwise `HTTP error <status>`.
    #[must_use]
    pub fn from_response(status: u16, body: Option<Value>) -> Self {
        let message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map_or_else(|| format!("HTTP error {status}"), str::to_owned);

        Self::Http {
            status,
            message,
            body,
        }
    }
}

impl From<ParseIdError> for ApiError {
    fn from(err: ParseIdError) -> Self {
        Self::Validation(format!("Valid {} ID required", err.entity))
    }
}

/// Body substituted when an error response is not valid JSON.
#[must_use]
pub fn synthesized_error_body(status: u16) -> Value {
    serde_json::json!({
        "error": true,
        "message": "Failed to parse response",
        "code": status,
    })
}
