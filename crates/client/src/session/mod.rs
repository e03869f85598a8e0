//! Session store: who is logged in, and as what role.
//!
//! The session is two values, a bearer token and a role, kept in durable
//! storage and shared by everything in the process that talks to the API.
//!
//! # Design
//!
//! - [`SessionStore`] is the injectable interface (get / set / clear / subscribe)
//! - [`MemorySessionStore`] keeps the session in process memory; clones share it
//! - [`FileSessionStore`] persists it as JSON and picks up external changes
//!
//! Every store publishes through a `tokio::sync::watch` channel, so readers
//! holding a receiver see logins, logouts and external changes without polling.
//!
//! # Trust model
//!
//! The role is stored exactly as the login response asserted it. Nothing
//! binds it to the token, so it decides what the client *offers*; the server
//! still decides what is *allowed*.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use std::fmt;

use lopcafe_core::Role;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key for the role.
pub const ROLE_KEY: &str = "role";

/// Errors raised by session storage.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the backing storage failed.
    #[error("session storage I/O error at {path}: {source}")]
    Io {
        /// Storage location.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The stored session could not be decoded.
    #[error("corrupt session data at {path}: {message}")]
    Corrupt {
        /// Storage location.
        path: String,
        /// Decoder message.
        message: String,
    },
}

/// A snapshot of the client session.
///
/// A missing token means the client is unauthenticated, whatever the role says.
#[derive(Clone, Default)]
pub struct Session {
    /// Bearer token, if logged in.
    pub token: Option<SecretString>,
    /// Role asserted at login. Defaults to [`Role::User`].
    pub role: Role,
}

impl Session {
    /// An unauthenticated session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated session.
    #[must_use]
    pub const fn authenticated(token: SecretString, role: Role) -> Self {
        Self {
            token: Some(token),
            role,
        }
    }

    /// Whether a token is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The role, but only while authenticated.
    #[must_use]
    pub const fn effective_role(&self) -> Option<Role> {
        if self.token.is_some() {
            Some(self.role)
        } else {
            None
        }
    }

    /// Whether two snapshots hold the same token and role.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        let tokens_match = match (&self.token, &other.token) {
            (None, None) => true,
            (Some(a), Some(b)) => a.expose_secret() == b.expose_secret(),
            _ => false,
        };
        tokens_match && self.role == other.role
    }

    /// Decode from the persisted two-key representation.
    pub(crate) fn from_stored(stored: StoredSession) -> Self {
        Self {
            token: stored
                .token
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            role: Role::from_stored(stored.role.as_deref()),
        }
    }

    /// Encode into the persisted two-key representation.
    pub(crate) fn to_stored(&self) -> StoredSession {
        StoredSession {
            token: self.token.as_ref().map(|t| t.expose_secret().to_owned()),
            role: self.token.as_ref().map(|_| self.role.as_str().to_owned()),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .finish()
    }
}

/// On-disk / in-storage shape: two string values under fixed keys.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct StoredSession {
    #[serde(rename = "token", default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "role", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Shared, observable session state.
///
/// Implementations must be safe to read from many tasks at once, and every
/// instance that shares the same storage must observe every write.
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// Current session snapshot.
    fn session(&self) -> Session;

    /// Current bearer token, if any.
    fn token(&self) -> Option<SecretString> {
        self.session().token
    }

    /// Current role. [`Role::User`] when unset.
    fn role(&self) -> Role {
        self.session().role
    }

    /// Persist a new token and role.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the backing storage cannot be written.
    fn set_session(&self, token: SecretString, role: Role) -> Result<(), SessionError>;

    /// Remove token and role together (logout).
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the backing storage cannot be written.
    fn clear(&self) -> Result<(), SessionError>;

    /// Receive every future change of the session.
    fn subscribe(&self) -> watch::Receiver<Session>;
}

/// Watch-channel cell holding the current session.
///
/// The sender owns the value, so reads never race with publication.
#[derive(Debug)]
pub(crate) struct SessionCell {
    sender: watch::Sender<Session>,
}

impl SessionCell {
    pub(crate) fn new(initial: Session) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    pub(crate) fn get(&self) -> Session {
        self.sender.borrow().clone()
    }

    /// Publish unconditionally, waking every subscriber.
    pub(crate) fn publish(&self, session: Session) {
        self.sender.send_replace(session);
    }

    /// Publish only if the session differs. Returns whether it changed.
    pub(crate) fn publish_if_changed(&self, session: Session) -> bool {
        self.sender.send_if_modified(|current| {
            if current.same_as(&session) {
                false
            } else {
                *current = session;
                true
            }
        })
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Session> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_has_no_effective_role() {
        let session = Session {
            token: None,
            role: Role::Admin,
        };
        assert!(!session.is_authenticated());
        assert_eq!(session.effective_role(), None);
    }

    #[test]
    fn test_authenticated_effective_role() {
        let session = Session::authenticated(SecretString::from("T"), Role::Admin);
        assert_eq!(session.effective_role(), Some(Role::Admin));
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::authenticated(SecretString::from("super-secret"), Role::User);
        let debug = format!("{session:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_stored_roundtrip_uses_fixed_keys() {
        let session = Session::authenticated(SecretString::from("abc"), Role::Admin);
        let json = serde_json::to_value(session.to_stored()).unwrap();
        assert_eq!(json, serde_json::json!({"token": "abc", "role": "Admin"}));
    }

    #[test]
    fn test_stored_empty_token_is_anonymous() {
        let stored = StoredSession {
            token: Some(String::new()),
            role: Some("Admin".to_string()),
        };
        assert!(!Session::from_stored(stored).is_authenticated());
    }

    #[test]
    fn test_stored_unknown_role_reads_as_user() {
        let stored = StoredSession {
            token: Some("t".to_string()),
            role: Some("Barista".to_string()),
        };
        assert_eq!(Session::from_stored(stored).role, Role::User);
    }

    #[test]
    fn test_cell_publish_if_changed() {
        let cell = SessionCell::new(Session::anonymous());
        let mut rx = cell.subscribe();

        assert!(!cell.publish_if_changed(Session::anonymous()));
        assert!(!rx.has_changed().unwrap());

        let next = Session::authenticated(SecretString::from("x"), Role::User);
        assert!(cell.publish_if_changed(next));
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());
    }
}
