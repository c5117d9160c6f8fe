//! Session lifecycle: the time-bounded decrypted-secret cache.
//!
//! State machine per wallet id: LOCKED -> UNLOCKED (on `unlock`) -> LOCKED
//! (on expiry, explicit `lock`, or the armed timer firing). `renew` replaces
//! the session in place: fresh session key, fresh expiry, re-armed timer.
//!
//! After a successful unlock the password is gone; every subsequent `read`
//! decrypts with the session record's own ephemeral key. The timer fire is
//! the only autonomous transition and races an explicit `lock` safely: both
//! reduce to an idempotent record erase behind the same mutation lock.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use lw_crypto::{aead, SessionKey};

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::models::{session_storage_key, SessionRecord, WalletSecret};
use crate::timer::{ExpiryHook, ExpiryTimer};
use crate::vault::KeyVault;

/// Fixed session length: 15 minutes, matching the shipped extension.
pub const SESSION_DURATION: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub session_duration: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_duration: SESSION_DURATION,
        }
    }
}

struct SessionInner {
    kv: Arc<dyn KeyValueStore>,
    timer: Arc<dyn ExpiryTimer>,
    config: SessionConfig,
    /// Single mutation point: one in-flight vault/session operation at a
    /// time, so derive -> encrypt -> persist sequences never interleave.
    ops: Mutex<()>,
}

impl SessionInner {
    fn timer_name(wallet_id: &str) -> String {
        format!("session-expiry:{wallet_id}")
    }

    /// Timer-fire path. Erasing an already-absent record (a concurrent
    /// explicit lock won the race) is a no-op.
    async fn expire(&self, wallet_id: &str) {
        let _guard = self.ops.lock().await;
        match self.kv.remove(&session_storage_key(wallet_id)).await {
            Ok(()) => info!(wallet_id, "session timer fired, wallet locked"),
            Err(e) => warn!(wallet_id, error = %e, "failed to erase session on expiry"),
        }
    }
}

pub struct SessionManager {
    vault: KeyVault,
    inner: Arc<SessionInner>,
}

impl SessionManager {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        timer: Arc<dyn ExpiryTimer>,
        config: SessionConfig,
    ) -> Self {
        Self {
            vault: KeyVault::new(kv.clone()),
            inner: Arc::new(SessionInner {
                kv,
                timer,
                config,
                ops: Mutex::new(()),
            }),
        }
    }

    /// The vault behind this manager, for wallet creation/import and the
    /// UI's `exists` probe.
    pub fn vault(&self) -> &KeyVault {
        &self.vault
    }

    /// LOCKED -> UNLOCKED. Decrypts the vault record with `password`,
    /// re-encrypts the secret under a fresh session key, persists the
    /// session and arms the expiry timer. Failures are wrapped in
    /// `StoreError::Unlock` but keep "no wallet" distinguishable from
    /// "wrong password". Unlocking an unlocked wallet replaces the session.
    pub async fn unlock(&self, wallet_id: &str, password: &str) -> Result<(), StoreError> {
        let _guard = self.inner.ops.lock().await;
        let secret = self
            .vault
            .retrieve(wallet_id, password)
            .await
            .map_err(StoreError::unlock)?;
        self.create_session(wallet_id, &secret).await?;
        info!(wallet_id, "wallet unlocked");
        Ok(())
    }

    /// Return the decrypted secret from the live session. No password is
    /// involved; the record's own session key decrypts the cache. A stale
    /// record (missed timer, clock skew) is erased and reported as
    /// `SessionExpired`, never as a silent success.
    pub async fn read(&self, wallet_id: &str) -> Result<WalletSecret, StoreError> {
        let _guard = self.inner.ops.lock().await;
        let record = self.load_live(wallet_id).await?;
        let plaintext = aead::decrypt_with_key(&record.session_key, &record.encrypted_secret)?;
        WalletSecret::from_bytes(&plaintext)
    }

    /// Extend the session after wallet activity without re-prompting for a
    /// password: decrypt with the current session key, then rebuild the
    /// session exactly like unlock's success path (new key, full duration,
    /// re-armed timer).
    pub async fn renew(&self, wallet_id: &str) -> Result<(), StoreError> {
        let _guard = self.inner.ops.lock().await;
        let record = self.load_live(wallet_id).await?;
        let plaintext = aead::decrypt_with_key(&record.session_key, &record.encrypted_secret)?;
        let secret = WalletSecret::from_bytes(&plaintext)?;
        self.create_session(wallet_id, &secret).await?;
        debug!(wallet_id, "session renewed");
        Ok(())
    }

    /// Idempotent in any state: erase the session record and disarm the
    /// timer. Locking a wallet that was never unlocked succeeds.
    pub async fn lock(&self, wallet_id: &str) -> Result<(), StoreError> {
        let _guard = self.inner.ops.lock().await;
        self.inner.kv.remove(&session_storage_key(wallet_id)).await?;
        self.inner
            .timer
            .disarm(&SessionInner::timer_name(wallet_id))
            .await;
        info!(wallet_id, "wallet locked");
        Ok(())
    }

    /// UNLOCKED probe: live session record present and not past its expiry.
    /// Never decrypts.
    pub async fn is_unlocked(&self, wallet_id: &str) -> Result<bool, StoreError> {
        let _guard = self.inner.ops.lock().await;
        match self.load_live(wallet_id).await {
            Ok(_) => Ok(true),
            Err(StoreError::Locked(_)) | Err(StoreError::SessionExpired(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// UI accessor: the public address of the active (unlocked) wallet.
    pub async fn active_public_identity(&self, wallet_id: &str) -> Result<String, StoreError> {
        let secret = self.read(wallet_id).await?;
        Ok(secret.public_address.clone())
    }

    /// Success path shared by unlock and renew. Caller holds the ops lock.
    async fn create_session(
        &self,
        wallet_id: &str,
        secret: &WalletSecret,
    ) -> Result<(), StoreError> {
        let session_key = SessionKey::generate();
        let plaintext = secret.to_bytes()?;
        let encrypted_secret = aead::encrypt_with_key(&session_key, &plaintext)?;
        let expires_at =
            Utc::now().timestamp_millis() + self.inner.config.session_duration.as_millis() as i64;
        let record = SessionRecord {
            wallet_id: wallet_id.to_string(),
            encrypted_secret,
            session_key,
            expires_at,
        };
        self.inner
            .kv
            .set(&session_storage_key(wallet_id), serde_json::to_string(&record)?)
            .await?;

        let hook: ExpiryHook = {
            let inner = Arc::downgrade(&self.inner);
            let wallet_id = wallet_id.to_string();
            Box::pin(async move {
                if let Some(inner) = inner.upgrade() {
                    inner.expire(&wallet_id).await;
                }
            })
        };
        self.inner
            .timer
            .arm(
                &SessionInner::timer_name(wallet_id),
                self.inner.config.session_duration,
                hook,
            )
            .await;
        Ok(())
    }

    /// Load the session record, treating absence as LOCKED and a stale
    /// record as expired (erased on sight). Caller holds the ops lock.
    async fn load_live(&self, wallet_id: &str) -> Result<SessionRecord, StoreError> {
        let value = self
            .inner
            .kv
            .get(&session_storage_key(wallet_id))
            .await?
            .ok_or_else(|| StoreError::Locked(wallet_id.to_string()))?;
        let record: SessionRecord = serde_json::from_str(&value)?;
        if record.expires_at < Utc::now().timestamp_millis() {
            warn!(wallet_id, "stale session found past expiry, erasing");
            self.inner.kv.remove(&session_storage_key(wallet_id)).await?;
            self.inner
                .timer
                .disarm(&SessionInner::timer_name(wallet_id))
                .await;
            return Err(StoreError::SessionExpired(wallet_id.to_string()));
        }
        Ok(record)
    }
}
