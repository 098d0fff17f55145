//! Per-session credential store
//!
//! Holds one access/refresh credential pair per session key. Writes are
//! atomic per key (last-writer-wins behind the lock) and each entry carries
//! the abort handle of its pending renewal timer so that clearing the
//! session, or arming a replacement timer, cancels the old one.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::AbortHandle;

/// An access credential with optional refresh credential and expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub access: String,
    pub refresh: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct SessionEntry {
    credential: Credential,
    renewal: Option<AbortHandle>,
}

/// Thread-safe store of credentials keyed by session
#[derive(Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the credential for a session, if any
    pub async fn read(&self, session: &str) -> Option<Credential> {
        self.inner.read().await.get(session).map(|e| e.credential.clone())
    }

    /// Write (or overwrite) the credential for a session
    ///
    /// A pending renewal timer survives the write; timer ownership is
    /// managed separately via `arm_renewal` / `take_renewal`.
    pub async fn write(&self, session: &str, credential: Credential) {
        let mut map = self.inner.write().await;
        match map.get_mut(session) {
            Some(entry) => entry.credential = credential,
            None => {
                map.insert(
                    session.to_string(),
                    SessionEntry { credential, renewal: None },
                );
            }
        }
    }

    /// Remove the session's credential and cancel its pending renewal
    pub async fn clear(&self, session: &str) {
        let removed = self.inner.write().await.remove(session);
        if let Some(entry) = removed {
            if let Some(handle) = entry.renewal {
                handle.abort();
            }
        }
    }

    /// Record the session's pending renewal timer, cancelling any previous one
    ///
    /// If the session was cleared in the meantime the incoming timer is
    /// aborted immediately so no orphaned task outlives its credential.
    pub async fn arm_renewal(&self, session: &str, handle: AbortHandle) {
        let mut map = self.inner.write().await;
        match map.get_mut(session) {
            Some(entry) => {
                if let Some(previous) = entry.renewal.replace(handle) {
                    previous.abort();
                }
            }
            None => handle.abort(),
        }
    }

    /// Detach the pending renewal handle without aborting it
    ///
    /// Called by the renewal task itself when it fires, so that re-arming
    /// from inside the task never cancels the task that is running.
    pub async fn take_renewal(&self, session: &str) -> Option<AbortHandle> {
        self.inner.write().await.get_mut(session).and_then(|e| e.renewal.take())
    }

    /// Whether a renewal timer is currently pending for the session
    pub async fn has_pending_renewal(&self, session: &str) -> bool {
        self.inner
            .read()
            .await
            .get(session)
            .map(|e| e.renewal.is_some())
            .unwrap_or(false)
    }
}
