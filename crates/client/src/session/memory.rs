//! In-memory session store.

use std::sync::Arc;

use lopcafe_core::Role;
use secrecy::SecretString;
use tokio::sync::watch;

use super::{Session, SessionCell, SessionError, SessionStore};

/// Process-local session store.
///
/// Cloning is cheap and every clone shares the same session, the way tabs
/// of one browser share local storage. Nothing survives the process.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    cell: Arc<SessionCell>,
}

impl MemorySessionStore {
    /// Create an empty (logged out) store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_session(Session::anonymous())
    }

    /// Create a store that starts with `session`.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            cell: Arc::new(SessionCell::new(session)),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn session(&self) -> Session {
        self.cell.get()
    }

    fn set_session(&self, token: SecretString, role: Role) -> Result<(), SessionError> {
        self.cell.publish(Session::authenticated(token, role));
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.cell.publish(Session::anonymous());
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Session> {
        self.cell.subscribe()
    }
}
