//! Key vault: the persisted, password-encrypted wallet secret.
//!
//! One record per wallet id. The vault write is the sole source of truth for
//! "a wallet exists"; `exists` reports presence without ever attempting
//! decryption, so the UI can route onboarding vs login without a password.

use std::sync::Arc;

use tracing::{debug, info};

use lw_crypto::aead;

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::models::{vault_storage_key, VaultRecord, WalletSecret};

#[derive(Clone)]
pub struct KeyVault {
    kv: Arc<dyn KeyValueStore>,
}

impl KeyVault {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Encrypt `secret` under `password` and persist it, replacing any prior
    /// record for `id` (re-key by overwrite). The record is a single value
    /// under a single key, so the write either lands entirely or the prior
    /// record stays readable.
    pub async fn store(
        &self,
        id: &str,
        secret: &WalletSecret,
        password: &str,
    ) -> Result<(), StoreError> {
        let plaintext = secret.to_bytes()?;
        let encrypted_secret = aead::encrypt_with_password(password, &plaintext)?;
        let record = VaultRecord {
            id: id.to_string(),
            encrypted_secret,
        };
        self.kv
            .set(&vault_storage_key(id), serde_json::to_string(&record)?)
            .await?;
        info!(wallet_id = id, "vault record written");
        Ok(())
    }

    /// Decrypt and return the stored secret. Fails with `NotFound` when no
    /// record exists and propagates `CryptoError::Decrypt` on a wrong
    /// password; the two are never conflated.
    pub async fn retrieve(&self, id: &str, password: &str) -> Result<WalletSecret, StoreError> {
        let value = self
            .kv
            .get(&vault_storage_key(id))
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let record: VaultRecord = serde_json::from_str(&value)?;
        let plaintext = aead::decrypt_with_password(password, &record.encrypted_secret)?;
        debug!(wallet_id = id, "vault record decrypted");
        WalletSecret::from_bytes(&plaintext)
    }

    /// Presence check only. Touches no password and never attempts
    /// decryption.
    pub async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.kv.get(&vault_storage_key(id)).await?.is_some())
    }
}
