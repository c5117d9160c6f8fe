use lw_crypto::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("No vault record for wallet {0}")]
    NotFound(String),

    #[error("Wallet {0} is locked, unlock with password first")]
    Locked(String),

    #[error("Session for wallet {0} has expired")]
    SessionExpired(String),

    #[error("Unlock failed: {0}")]
    Unlock(#[source] Box<StoreError>),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
}

impl StoreError {
    /// Wrap a vault-retrieval failure from the unlock path, preserving the
    /// cause so callers can still route "no wallet" vs "wrong password".
    pub(crate) fn unlock(source: StoreError) -> Self {
        StoreError::Unlock(Box::new(source))
    }

    /// True when no vault record exists for the wallet (UI routes to
    /// onboarding).
    pub fn is_missing_wallet(&self) -> bool {
        match self {
            StoreError::NotFound(_) => true,
            StoreError::Unlock(inner) => inner.is_missing_wallet(),
            _ => false,
        }
    }

    /// True when decryption failed authentication (UI routes to login and
    /// reports a bad password).
    pub fn is_wrong_password(&self) -> bool {
        match self {
            StoreError::Crypto(CryptoError::Decrypt) => true,
            StoreError::Unlock(inner) => inner.is_wrong_password(),
            _ => false,
        }
    }
}
