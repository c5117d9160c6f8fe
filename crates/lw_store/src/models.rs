//! Persisted record models.
//!
//! Two logical tables share the key-value collaborator through key
//! namespaces: `vault/<id>` for the at-rest record and `session/<id>` for
//! the time-bounded unlocked cache. At most one record exists per wallet id
//! in each namespace.

use lw_crypto::{EncryptedBlob, SessionKey};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::StoreError;

/// The wallet's decrypted secret: raw private-key material plus the metadata
/// the UI needs to display the active identity. Opaque to this crate beyond
/// serialization; mnemonic/HD derivation produces it elsewhere.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct WalletSecret {
    pub key_data: Vec<u8>,
    pub public_address: String,
}

impl WalletSecret {
    /// Canonical byte form fed to the cipher engine.
    pub fn to_bytes(&self) -> Result<Zeroizing<Vec<u8>>, StoreError> {
        Ok(Zeroizing::new(serde_json::to_vec(self)?))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl std::fmt::Debug for WalletSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSecret")
            .field("key_data", &"[redacted]")
            .field("public_address", &self.public_address)
            .finish()
    }
}

/// At-rest record: the secret encrypted under the user's password.
/// Overwritten only by an explicit re-key; never partially written (one
/// record, one `set`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultRecord {
    pub id: String,
    pub encrypted_secret: EncryptedBlob,
}

/// Unlocked-session record: the secret re-encrypted under a random ephemeral
/// key, NOT under the password. The password is never retained after unlock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub wallet_id: String,
    pub encrypted_secret: EncryptedBlob,
    pub session_key: SessionKey,
    /// Unix millis; always `now + session duration` at creation or renewal.
    pub expires_at: i64,
}

pub fn vault_storage_key(id: &str) -> String {
    format!("vault/{id}")
}

pub fn session_storage_key(id: &str) -> String {
    format!("session/{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_secret_canonical_roundtrip() {
        let secret = WalletSecret {
            key_data: vec![0xAB; 32],
            public_address: "0xfeed".into(),
        };
        let bytes = secret.to_bytes().unwrap();
        assert_eq!(WalletSecret::from_bytes(&bytes).unwrap(), secret);
    }

    #[test]
    fn debug_never_prints_key_material() {
        let secret = WalletSecret {
            key_data: vec![0xAB; 32],
            public_address: "0xfeed".into(),
        };
        let rendered = format!("{secret:?}");
        assert!(rendered.contains("[redacted]"));
        assert!(!rendered.contains("171")); // 0xAB
    }

    #[test]
    fn storage_keys_are_namespaced() {
        assert_eq!(vault_storage_key("w1"), "vault/w1");
        assert_eq!(session_storage_key("w1"), "session/w1");
    }
}
