use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("AEAD encryption failed")]
    Encrypt,

    #[error("AEAD decryption failed (authentication tag mismatch: wrong password or tampering)")]
    Decrypt,

    #[error("Malformed encrypted blob: {0}")]
    MalformedBlob(String),

    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}
