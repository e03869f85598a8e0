//! CLI error type.

use lopcafe_client::Route;
use thiserror::Error;

/// Errors raised by the CLI itself, before or after calling the API.
#[derive(Debug, Error)]
pub enum CliError {
    /// The session may not use this command; the UI would navigate instead.
    #[error("{command} is not available to this session, redirecting to {}", redirect.path())]
    Redirect {
        command: &'static str,
        redirect: Route,
    },

    /// A path that no view serves.
    #[error("404 LopCafe Does not Support {0}")]
    NotFound(String),

    /// An argument failed to parse.
    #[error("Invalid {name}: {value:?}")]
    InvalidArgument { name: &'static str, value: String },

    /// Reading an input file failed.
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}
