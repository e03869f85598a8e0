//! LopCafe Client - session, authorization policy and REST API access.
//!
//! # Architecture
//!
//! - [`session`] - Who is logged in: token and role, shared and observable
//! - [`api`] - Typed calls to the LopCafe HTTP API, bearer token attached
//! - [`policy`] - One decision function for which views a session may enter
//!
//! Front ends build an [`ApiClient`] over an `Arc<dyn SessionStore>`, read the
//! session to pick what to show, and ask [`policy::authorize`] before entering
//! a protected view.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lopcafe_client::{ApiClient, ClientConfig, MemorySessionStore};
//! use secrecy::SecretString;
//!
//! # async fn run() -> Result<(), lopcafe_client::ApiError> {
//! let config = ClientConfig::from_env()?;
//! let api = ApiClient::new(&config, Arc::new(MemorySessionStore::new()))?;
//! api.login("a@b.com", &SecretString::from("x")).await?;
//! let orders = api.fetch_recent_orders(5).await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod policy;
pub mod session;

pub use api::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use policy::{Decision, Requirement, Route, authorize};
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionError, SessionStore,
};
