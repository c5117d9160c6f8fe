//! Authenticated encryption over the blob format.
//!
//! AES-256-GCM. Key size: 32 bytes. Nonce: 12 bytes (random per call).
//! Tag: 16 bytes. Every encrypt call draws a fresh salt and nonce, so two
//! encryptions of the same plaintext under the same password never produce
//! the same blob.
//!
//! Two symmetric pairs share the wire format:
//! - `*_with_password` runs PBKDF2 over the embedded salt (vault at rest).
//! - `*_with_key` runs HKDF over the embedded salt (session cache), skipping
//!   the expensive password stretch.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::blob::{EncryptedBlob, NONCE_LEN, SALT_LEN};
use crate::error::CryptoError;
use crate::kdf::{self, CipherKey, SessionKey};

/// Encrypt `plaintext` under a key derived from `password` and a fresh salt.
pub fn encrypt_with_password(
    password: &str,
    plaintext: &[u8],
) -> Result<EncryptedBlob, CryptoError> {
    let salt = kdf::generate_salt();
    let key = kdf::derive_key(password, &salt);
    seal(&key, &salt, plaintext)
}

/// Decrypt a blob by re-deriving the key from `password` and the embedded salt.
pub fn decrypt_with_password(
    password: &str,
    blob: &EncryptedBlob,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let parts = blob.parts()?;
    let key = kdf::derive_key(password, &parts.salt);
    open(&key, &parts.nonce, &parts.ciphertext)
}

/// Encrypt `plaintext` under an ephemeral session key. Same blob layout as
/// the password path; the embedded salt feeds HKDF instead of PBKDF2.
pub fn encrypt_with_key(
    session_key: &SessionKey,
    plaintext: &[u8],
) -> Result<EncryptedBlob, CryptoError> {
    let salt = kdf::generate_salt();
    let key = kdf::expand_key(session_key, &salt)?;
    seal(&key, &salt, plaintext)
}

/// Decrypt a session-key blob.
pub fn decrypt_with_key(
    session_key: &SessionKey,
    blob: &EncryptedBlob,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let parts = blob.parts()?;
    let key = kdf::expand_key(session_key, &parts.salt)?;
    open(&key, &parts.nonce, &parts.ciphertext)
}

fn seal(
    key: &CipherKey,
    salt: &[u8; SALT_LEN],
    plaintext: &[u8],
) -> Result<EncryptedBlob, CryptoError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0));
    let mut nonce = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::Encrypt)?;

    Ok(EncryptedBlob::assemble(salt, &nonce, &ciphertext))
}

fn open(
    key: &CipherKey,
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Decrypt)?;
    Ok(Zeroizing::new(plaintext))
}
