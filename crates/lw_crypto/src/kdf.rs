//! Key derivation.
//!
//! `derive_key` - PBKDF2-HMAC-SHA256, stretches the user password into the
//!   32-byte key that encrypts the vault record at rest.
//!
//! `expand_key` - HKDF-SHA256, expands an ephemeral session key plus a
//!   per-blob salt into a fresh AEAD key, so the session path shares the
//!   blob format without re-running the expensive password KDF.

use hkdf::Hkdf;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::blob::SALT_LEN;
use crate::error::CryptoError;

/// PBKDF2 round count. Matches the deployed vault format; changing it breaks
/// decryption of existing records.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

pub const KEY_LEN: usize = 32;

const SESSION_HKDF_INFO: &[u8] = b"lumen-session-seal-v1";

/// 32-byte AEAD key. Zeroized on drop, never serialized.
#[derive(ZeroizeOnDrop)]
pub struct CipherKey(pub(crate) [u8; KEY_LEN]);

/// Random ephemeral key protecting one unlocked session. Persisted inside
/// the session record, so it is serde-visible, unlike [`CipherKey`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; KEY_LEN]);

impl SessionKey {
    /// Fresh random key. Called on every unlock and every renewal; a session
    /// key is never reused across sessions.
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        rand::rngs::OsRng.fill_bytes(&mut key);
        Self(key)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

/// Derive a vault key from a user password + 16-byte salt.
/// Deterministic for a given (password, salt) pair; deliberately expensive.
/// The salt is stored in the blob header (not secret).
pub fn derive_key(password: &str, salt: &[u8; SALT_LEN]) -> CipherKey {
    let mut output = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut output);
    CipherKey(output)
}

/// Expand a session key + per-blob salt into a one-use AEAD key.
pub fn expand_key(key: &SessionKey, salt: &[u8; SALT_LEN]) -> Result<CipherKey, CryptoError> {
    let hk = Hkdf::<Sha256>::new(Some(salt.as_slice()), key.as_bytes());
    let mut output = [0u8; KEY_LEN];
    hk.expand(SESSION_HKDF_INFO, &mut output)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(CipherKey(output))
}

/// Generate a fresh random 16-byte salt (one per encrypt call).
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_key_is_deterministic() {
        let salt = [3u8; SALT_LEN];
        let a = derive_key("hunter2", &salt);
        let b = derive_key("hunter2", &salt);
        assert_eq!(a.0, b.0);
    }

    #[test]
    fn derive_key_depends_on_password_and_salt() {
        let salt = [3u8; SALT_LEN];
        let base = derive_key("hunter2", &salt);
        assert_ne!(base.0, derive_key("hunter3", &salt).0);
        assert_ne!(base.0, derive_key("hunter2", &[4u8; SALT_LEN]).0);
    }

    #[test]
    fn session_keys_are_unique() {
        assert_ne!(SessionKey::generate(), SessionKey::generate());
    }

    #[test]
    fn expand_key_varies_with_salt() {
        let sk = SessionKey::generate();
        let a = expand_key(&sk, &[1u8; SALT_LEN]).unwrap();
        let b = expand_key(&sk, &[2u8; SALT_LEN]).unwrap();
        assert_ne!(a.0, b.0);
    }
}
