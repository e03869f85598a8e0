//! Command implementations.
//!
//! Each command names the view it stands for and asks the authorization
//! policy before calling the API, so the CLI gates exactly like the web UI.

pub mod auth;
pub mod catalog;
pub mod orders;
pub mod recipes;
pub mod session;
pub mod upload;

use std::sync::Arc;

use lopcafe_client::{ApiClient, ClientConfig, FileSessionStore, Route, SessionStore};

use crate::error::CliError;

/// Shared state for one CLI invocation.
pub struct Context {
    pub api: ApiClient,
    pub store: FileSessionStore,
}

impl Context {
    /// Open the session file and build the API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file is unreadable or the client
    /// cannot be built.
    pub fn open(config: &ClientConfig) -> Result<Self, lopcafe_client::ApiError> {
        let store = FileSessionStore::open(&config.session_file)?;
        let api = ApiClient::new(config, Arc::new(store.clone()))?;
        tracing::debug!(
            api_url = %config.api_url,
            session_file = %store.path().display(),
            "CLI context ready"
        );
        Ok(Self { api, store })
    }

    /// Fail with the policy's redirect unless the session may use `route`.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Redirect` when the policy denies access.
    pub fn gate(&self, command: &'static str, route: Route) -> Result<(), CliError> {
        match route.authorize(&self.store.session()).redirect() {
            None => Ok(()),
            Some(redirect) => {
                tracing::debug!(command, route = route.path(), to = redirect.path(), "Access denied");
                Err(CliError::Redirect { command, redirect })
            }
        }
    }
}
