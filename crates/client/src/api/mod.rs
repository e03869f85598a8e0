//! LopCafe REST API client.
//!
//! Every request goes through one send path, which:
//!
//! - attaches `Authorization: Bearer <token>` whenever the session has a token
//! - maps 204 to `None` without reading the body
//! - turns non-2xx responses into [`ApiError::Http`], synthesizing a body
//!   when the server did not send JSON
//!
//! Operations check their local preconditions first and return
//! [`ApiError::Validation`] or [`ApiError::AuthRequired`] without touching
//! the network.

mod auth;
mod catalog;
mod orders;
mod recipes;
mod types;
mod upload;

pub use orders::DEFAULT_ORDER_LIMIT;
pub use types::*;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, synthesized_error_body};
use crate::session::{FileSessionStore, SessionStore};

/// LopCafe API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("session", &self.inner.session)
            .finish()
    }
}

impl ApiClient {
    /// Create a client for `config.api_url` that reads its token from `session`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lopcafe-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.clone(),
                session,
            }),
        })
    }

    /// Create a client from environment variables, backed by the session file.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` for an invalid `LOPCAFE_API_URL` and
    /// `ApiError::Session` if the session file cannot be read.
    pub fn from_env() -> Result<Self, ApiError> {
        let config = ClientConfig::from_env()?;
        let store = FileSessionStore::open(&config.session_file)?;
        Self::new(&config, Arc::new(store))
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The session store this client reads its token from.
    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.inner.session
    }

    /// Absolute URL for an API path such as `/orders/`.
    fn url(&self, path: &str) -> String {
        format!(
            "{}{path}",
            self.inner.base_url.as_str().trim_end_matches('/')
        )
    }

    /// Absolute URL with a form-encoded query string.
    fn url_with_query(&self, path: &str, query: &[(&str, String)]) -> String {
        if query.is_empty() {
            return self.url(path);
        }
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in query {
            serializer.append_pair(key, value);
        }
        format!("{}?{}", self.url(path), serializer.finish())
    }

    /// Current token, or `AuthRequired` if logged out.
    fn require_token(&self) -> Result<SecretString, ApiError> {
        self.inner.session.token().ok_or(ApiError::AuthRequired)
    }

    /// Start a request, attaching the bearer token when one exists.
    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match self.inner.session.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and decode the JSON response.
    ///
    /// Returns `Ok(None)` for 204 No Content.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, ApiError> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, "Request failed before a response arrived");
            ApiError::Network(e)
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Received response");

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let bytes = response.bytes().await.map_err(ApiError::Network)?;

        if !status.is_success() {
            let code = status.as_u16();
            let body = serde_json::from_slice::<Value>(&bytes)
                .unwrap_or_else(|_| synthesized_error_body(code));
            let err = ApiError::from_response(code, Some(body));
            error!(status = code, error = %err, "API request failed");
            return Err(err);
        }

        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            error!(status = status.as_u16(), error = %e, "Failed to parse response");
            ApiError::Parse(e.to_string())
        })
    }

    /// GET a JSON list; 204 is an empty list.
    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ApiError> {
        let url = self.url_with_query(path, query);
        let items = self.send(self.request(Method::GET, url)).await?;
        Ok(items.unwrap_or_default())
    }
}

/// Reject blank required text fields.
fn require_text(value: &str, message: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lopcafe_core::Role;

    use super::*;
    use crate::session::MemorySessionStore;

    fn client(base: &str) -> ApiClient {
        let config = ClientConfig::new(base, "unused.json").unwrap();
        ApiClient::new(&config, Arc::new(MemorySessionStore::new())).unwrap()
    }

    #[test]
    fn test_url_join_handles_trailing_slash() {
        assert_eq!(
            client("http://localhost:5000").url("/orders/"),
            "http://localhost:5000/orders/"
        );
        assert_eq!(
            client("http://localhost:5000/api/").url("/orders/7"),
            "http://localhost:5000/api/orders/7"
        );
    }

    #[test]
    fn test_url_with_query_encodes_pairs() {
        let url = client("http://localhost:5000").url_with_query(
            "/orders/",
            &[("limit", "5".to_string()), ("status", "Pending".to_string())],
        );
        assert_eq!(url, "http://localhost:5000/orders/?limit=5&status=Pending");
    }

    #[test]
    fn test_require_token() {
        let api = client("http://localhost:5000");
        assert!(matches!(api.require_token(), Err(ApiError::AuthRequired)));

        api.session()
            .set_session(SecretString::from("T"), Role::User)
            .unwrap();
        assert_eq!(api.require_token().unwrap().expose_secret(), "T");
    }

    #[test]
    fn test_require_text() {
        assert!(require_text("x", "needed").is_ok());
        let err = require_text("   ", "Name is required").unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let api = client("http://localhost:5000");
        api.session()
            .set_session(SecretString::from("hidden-token"), Role::Admin)
            .unwrap();
        assert!(!format!("{api:?}").contains("hidden-token"));
    }
}
