//! Token lifecycle management
//!
//! Drives the credential state machine: `Unauthenticated → Exchanging →
//! Authenticated → Refreshing → {Authenticated | Unauthenticated}`.
//!
//! Each successful exchange or refresh arms exactly one renewal timer,
//! scheduled a safety margin before the credential expires. A failed
//! refresh is fatal for the session: all stored credentials are cleared and
//! the caller must force re-authentication. There is no retry loop.

use crate::store::{Credential, CredentialStore};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uniwell_common::{Error, Result};

/// Renewal fires this long before the access credential expires,
/// absorbing clock skew and network latency
pub const RENEWAL_SAFETY_MARGIN: Duration = Duration::from_secs(60);

/// Token pair returned by the identity provider's token endpoint
///
/// Field names match the provider's wire contract exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_in: u64,
}

/// Seam to the identity provider's token endpoint
///
/// Implemented by `SpotifyClient` in production and by mocks in tests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Trade a one-time authorization code for a token pair
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant>;

    /// Trade a refresh credential for a new token pair
    async fn refresh_grant(&self, refresh_token: &str) -> Result<TokenGrant>;
}

/// Manages credential exchange, proactive renewal, and logout per session
pub struct TokenLifecycle {
    provider: Arc<dyn TokenProvider>,
    store: CredentialStore,
    renewal_margin: Duration,
}

impl TokenLifecycle {
    pub fn new(provider: Arc<dyn TokenProvider>, store: CredentialStore) -> Arc<Self> {
        Arc::new(Self {
            provider,
            store,
            renewal_margin: RENEWAL_SAFETY_MARGIN,
        })
    }

    /// Construct with a custom renewal margin (tests use short margins)
    pub fn with_renewal_margin(
        provider: Arc<dyn TokenProvider>,
        store: CredentialStore,
        renewal_margin: Duration,
    ) -> Arc<Self> {
        Arc::new(Self { provider, store, renewal_margin })
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Exchange a one-time authorization code for a credential pair
    ///
    /// On success the credential is stored and one renewal timer is armed.
    /// On failure the provider's error is surfaced to the caller and no
    /// state is touched (there is none yet for this session).
    pub async fn exchange(self: &Arc<Self>, session: &str, code: &str) -> Result<TokenGrant> {
        debug!(session = %session, "Exchanging authorization code");
        let grant = self.provider.exchange_code(code).await?;

        self.store_grant(session, &grant, None).await;
        info!(
            session = %session,
            expires_in = grant.expires_in,
            "Authenticated via authorization code"
        );

        if grant.refresh_token.is_some() {
            self.arm_renewal(session, grant.expires_in).await;
        }

        Ok(grant)
    }

    /// Refresh the session's access credential using its stored refresh credential
    ///
    /// Any failure (no stored credential, or a non-2xx from the provider)
    /// clears the session entirely; the caller must re-authenticate.
    pub async fn refresh(self: &Arc<Self>, session: &str) -> Result<TokenGrant> {
        let Some(current) = self.store.read(session).await else {
            return Err(Error::Validation(format!(
                "No credential stored for session '{}'",
                session
            )));
        };
        let Some(refresh_token) = current.refresh.clone() else {
            self.store.clear(session).await;
            return Err(Error::Validation(format!(
                "Session '{}' has no refresh credential",
                session
            )));
        };

        debug!(session = %session, "Refreshing access credential");
        match self.provider.refresh_grant(&refresh_token).await {
            Ok(grant) => {
                // Keep the previous refresh credential unless the provider rotated it
                self.store_grant(session, &grant, Some(refresh_token)).await;
                info!(
                    session = %session,
                    expires_in = grant.expires_in,
                    rotated = grant.refresh_token.is_some(),
                    "Access credential refreshed"
                );
                self.arm_renewal(session, grant.expires_in).await;
                Ok(grant)
            }
            Err(e) => {
                warn!(session = %session, "Refresh failed, clearing credentials: {}", e);
                self.store.clear(session).await;
                Err(e)
            }
        }
    }

    /// Clear the session's credentials, cancelling any pending renewal
    pub async fn logout(&self, session: &str) {
        info!(session = %session, "Clearing stored credentials");
        self.store.clear(session).await;
    }

    async fn store_grant(&self, session: &str, grant: &TokenGrant, previous_refresh: Option<String>) {
        let credential = Credential {
            access: grant.access_token.clone(),
            refresh: grant.refresh_token.clone().or(previous_refresh),
            expires_at: Some(Utc::now() + chrono::Duration::seconds(grant.expires_in as i64)),
        };
        self.store.write(session, credential).await;
    }

    /// Arm the session's single renewal timer
    ///
    /// The task refreshes the credential when it fires; a successful refresh
    /// re-arms from here, so renewal is self-perpetuating. The abort handle
    /// is registered before the task is released so a concurrent clear
    /// always finds something to cancel.
    // Returns an explicitly boxed future so the opaque `impl Future` type
    // never appears in the refresh → arm_renewal → spawn → refresh cycle;
    // otherwise the compiler cannot resolve the `Send` auto-trait.
    fn arm_renewal<'a>(
        self: &'a Arc<Self>,
        session: &'a str,
        expires_in: u64,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
        let delay = Duration::from_secs(expires_in).saturating_sub(self.renewal_margin);
        debug!(session = %session, delay_secs = delay.as_secs(), "Arming renewal timer");

        let lifecycle = Arc::clone(self);
        let session_key = session.to_string();
        let (registered_tx, registered_rx) = tokio::sync::oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            // Wait until our abort handle is registered in the store
            if registered_rx.await.is_err() {
                return;
            }
            tokio::time::sleep(delay).await;

            // Detach our own handle first so the re-arm inside refresh()
            // does not abort the task that is currently running
            lifecycle.store.take_renewal(&session_key).await;

            // The boxed future erases the recursion: this task awaits
            // refresh(), which awaits arm_renewal(), which spawns this task.
            // Without the erasure the Send bound cannot be resolved.
            let refresh: Pin<Box<dyn Future<Output = Result<TokenGrant>> + Send>> = {
                let lifecycle = Arc::clone(&lifecycle);
                let session = session_key.clone();
                Box::pin(async move { lifecycle.refresh(&session).await })
            };
            if let Err(e) = refresh.await {
                warn!(session = %session_key, "Proactive renewal failed: {}", e);
            }
        });

        self.store.arm_renewal(session, task.abort_handle()).await;
        let _ = registered_tx.send(());
        })
    }
}
