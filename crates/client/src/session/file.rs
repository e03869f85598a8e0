//! File-backed session store.
//!
//! The session lives in a small JSON document holding the `token` and `role`
//! keys. The file is the source of truth:
//!
//! - stores opened on the same path inside one process share one state cell,
//!   so a write through any of them is seen by all of them immediately
//! - writes by other processes are picked up by [`FileSessionStore::reload`],
//!   which [`FileSessionStore::spawn_watcher`] runs on an interval

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, PoisonError, Weak};
use std::time::Duration;

use lopcafe_core::Role;
use secrecy::SecretString;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{Session, SessionCell, SessionError, SessionStore, StoredSession};

/// Open stores, keyed by canonical path.
static REGISTRY: LazyLock<Mutex<HashMap<PathBuf, Weak<FileSessionInner>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Durable session store persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    inner: Arc<FileSessionInner>,
}

#[derive(Debug)]
struct FileSessionInner {
    path: PathBuf,
    cell: SessionCell,
    /// Serializes read-modify-publish sequences.
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Open the session stored at `path`.
    ///
    /// A missing file is an empty session; it is created on the first login.
    /// Opening the same path twice returns stores that share state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the file exists but cannot be read, or
    /// `SessionError::Corrupt` if it is not a valid session document.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = canonical_path(path.as_ref()).map_err(|source| SessionError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;

        let mut registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(inner) = registry.get(&path).and_then(Weak::upgrade) {
            debug!(path = %path.display(), "Reusing open session store");
            return Ok(Self { inner });
        }

        let session = read_session(&path)?;
        let inner = Arc::new(FileSessionInner {
            path: path.clone(),
            cell: SessionCell::new(session),
            write_lock: Mutex::new(()),
        });
        registry.retain(|_, weak| weak.strong_count() > 0);
        registry.insert(path, Arc::downgrade(&inner));

        Ok(Self { inner })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Re-read the file and republish if it changed behind our back.
    ///
    /// Returns whether subscribers were notified.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the file cannot be read or decoded.
    pub fn reload(&self) -> Result<bool, SessionError> {
        let _guard = self
            .inner
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let session = read_session(&self.inner.path)?;
        let changed = self.inner.cell.publish_if_changed(session);
        if changed {
            info!(path = %self.inner.path.display(), "Session changed externally");
        }
        Ok(changed)
    }

    /// Reload the file every `period` on the current Tokio runtime.
    ///
    /// File reads run on the blocking pool.
    /// The task ends once every handle to this store has been dropped.
    /// Read errors are logged and retried on the next tick.
    #[must_use]
    pub fn spawn_watcher(&self, period: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let Some(inner) = weak.upgrade() else {
                    debug!("Session store dropped, stopping watcher");
                    break;
                };
                let store = Self { inner };
                match tokio::task::spawn_blocking(move || store.reload()).await {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => warn!(error = %e, "Failed to reload session file"),
                    Err(e) => warn!(error = %e, "Session reload task failed"),
                }
            }
        })
    }
}

impl SessionStore for FileSessionStore {
    fn session(&self) -> Session {
        self.inner.cell.get()
    }

    fn set_session(&self, token: SecretString, role: Role) -> Result<(), SessionError> {
        let _guard = self
            .inner
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let session = Session::authenticated(token, role);
        write_session(&self.inner.path, &session.to_stored())?;
        self.inner.cell.publish(session);
        debug!(path = %self.inner.path.display(), role = %role, "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let _guard = self
            .inner
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match std::fs::remove_file(&self.inner.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.inner.path.display().to_string(),
                    source,
                });
            }
        }
        self.inner.cell.publish(Session::anonymous());
        debug!(path = %self.inner.path.display(), "Session cleared");
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.cell.subscribe()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Resolve `path` to the one spelling shared by every alias of the file.
///
/// The file (and possibly some parents) may not exist yet, so the deepest
/// existing ancestor is canonicalized and the missing tail is joined back on.
fn canonical_path(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut missing = Vec::new();
    let mut existing = absolute.as_path();

    let mut resolved = loop {
        match std::fs::canonicalize(existing) {
            Ok(resolved) => break resolved,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let (Some(parent), Some(name)) = (existing.parent(), existing.file_name()) else {
                    return Ok(absolute);
                };
                missing.push(name.to_owned());
                existing = parent;
            }
            Err(e) => return Err(e),
        }
    };

    for name in missing.iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}

fn read_session(path: &Path) -> Result<Session, SessionError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Session::anonymous()),
        Err(source) => {
            return Err(SessionError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };

    if contents.trim().is_empty() {
        return Ok(Session::anonymous());
    }

    let stored: StoredSession =
        serde_json::from_str(&contents).map_err(|e| SessionError::Corrupt {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    Ok(Session::from_stored(stored))
}

/// Write via a sibling temp file and rename, so readers never see half a document.
fn write_session(path: &Path, stored: &StoredSession) -> Result<(), SessionError> {
    let io_err = |source| SessionError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_vec_pretty(stored).map_err(|e| SessionError::Corrupt {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&tmp_path).map_err(io_err)?;
    file.write_all(&json).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    drop(file);

    std::fs::rename(&tmp_path, path).map_err(io_err)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_missing_file_is_logged_out() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::open(dir.path().join("session.json")).unwrap();
        assert!(store.token().is_none());
        assert_eq!(store.role(), Role::User);
    }

    #[test]
    fn test_set_session_persists_fixed_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::open(&path).unwrap();

        store
            .set_session(SecretString::from("T"), Role::Admin)
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"token": "T", "role": "Admin"}));
    }

    #[test]
    fn test_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        {
            let store = FileSessionStore::open(&path).unwrap();
            store
                .set_session(SecretString::from("persisted"), Role::User)
                .unwrap();
        }

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.token().unwrap().expose_secret(), "persisted");
    }

    #[test]
    fn test_independent_opens_share_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let first = FileSessionStore::open(&path).unwrap();
        let second = FileSessionStore::open(&path).unwrap();

        first
            .set_session(SecretString::from("T"), Role::Admin)
            .unwrap();
        assert_eq!(second.token().unwrap().expose_secret(), "T");
        assert_eq!(second.role(), Role::Admin);

        second.clear().unwrap();
        assert!(first.token().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_aliased_paths_share_state() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let direct = FileSessionStore::open(dir.path().join("session.json")).unwrap();
        let aliased =
            FileSessionStore::open(dir.path().join("sub").join("..").join("session.json")).unwrap();

        direct
            .set_session(SecretString::from("T"), Role::Admin)
            .unwrap();
        assert_eq!(aliased.token().unwrap().expose_secret(), "T");
        assert_eq!(aliased.role(), Role::Admin);
        assert_eq!(direct.path(), aliased.path());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_shares_state() {
        let dir = TempDir::new().unwrap();
        let links = TempDir::new().unwrap();
        let link = links.path().join("link");
        std::os::unix::fs::symlink(dir.path(), &link).unwrap();

        let direct = FileSessionStore::open(dir.path().join("session.json")).unwrap();
        let linked = FileSessionStore::open(link.join("session.json")).unwrap();

        linked
            .set_session(SecretString::from("via-link"), Role::User)
            .unwrap();
        assert_eq!(direct.token().unwrap().expose_secret(), "via-link");

        direct.clear().unwrap();
        assert!(linked.token().is_none());
    }

    #[test]
    fn test_missing_parent_keeps_requested_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileSessionStore::open(&path).unwrap();

        assert!(store.path().ends_with("nested/session.json"));
        store
            .set_session(SecretString::from("T"), Role::User)
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_reload_picks_up_external_logout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::open(&path).unwrap();
        store
            .set_session(SecretString::from("T"), Role::User)
            .unwrap();
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        // Another process logs out.
        std::fs::remove_file(&path).unwrap();

        assert!(store.reload().unwrap());
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().is_authenticated());

        // Nothing changed since.
        assert!(!store.reload().unwrap());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = FileSessionStore::open(&path);
        assert!(matches!(result, Err(SessionError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_watcher_notifies_subscribers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::open(&path).unwrap();
        let mut rx = store.subscribe();
        let watcher = store.spawn_watcher(Duration::from_millis(20));

        // Another process logs in.
        std::fs::write(&path, r#"{"token": "external", "role": "Admin"}"#).unwrap();

        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .unwrap()
            .unwrap();
        let session = rx.borrow().clone();
        assert_eq!(session.token.unwrap().expose_secret(), "external");
        assert_eq!(session.role, Role::Admin);

        watcher.abort();
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_watcher_survives_unreadable_tick() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::open(&path).unwrap();
        let mut rx = store.subscribe();
        let watcher = store.spawn_watcher(Duration::from_millis(20));

        std::fs::write(&path, "{not json").unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!rx.has_changed().unwrap());

        std::fs::write(&path, r#"{"token": "later", "role": "User"}"#).unwrap();
        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            rx.borrow().token.as_ref().unwrap().expose_secret(),
            "later"
        );

        watcher.abort();
    }
}
