//! The encrypted blob wire format.
//!
//! Binary layout (the compatibility contract):
//!   [ salt (16 bytes) | nonce (12 bytes) | ciphertext + tag (>= 16 bytes) ]
//!
//! The outer encoding is base64 (STANDARD), which is what lands in the
//! key-value store. The layout is fixed-offset; there is no header versioning
//! because the salt and nonce lengths are part of the contract.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

/// Minimum decoded length: full header plus an authentication tag.
const MIN_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Base64 text form of one encrypted payload. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedBlob(String);

/// Decoded fixed-offset regions of a blob.
pub struct BlobParts {
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

impl EncryptedBlob {
    /// Assemble a blob from its regions, in wire order.
    pub fn assemble(salt: &[u8; SALT_LEN], nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Self {
        let mut raw = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
        raw.extend_from_slice(salt);
        raw.extend_from_slice(nonce);
        raw.extend_from_slice(ciphertext);
        Self(general_purpose::STANDARD.encode(raw))
    }

    /// Re-wrap stored base64 text as a blob. No validation happens here;
    /// `parts` rejects anything malformed.
    pub fn from_base64(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into the fixed-offset regions.
    pub fn parts(&self) -> Result<BlobParts, CryptoError> {
        let raw = general_purpose::STANDARD.decode(&self.0)?;
        if raw.len() < MIN_LEN {
            return Err(CryptoError::MalformedBlob(format!(
                "{} bytes, need at least {MIN_LEN}",
                raw.len()
            )));
        }
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&raw[..SALT_LEN]);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&raw[SALT_LEN..SALT_LEN + NONCE_LEN]);
        Ok(BlobParts {
            salt,
            nonce,
            ciphertext: raw[SALT_LEN + NONCE_LEN..].to_vec(),
        })
    }
}
