//! lw_crypto - Lumen Wallet cryptographic primitives
//!
//! # Design principles
//! - NO custom crypto; all primitives come from audited Rust crates.
//! - Zeroize all secret material on drop.
//! - Every blob is authenticated: a wrong password or a single flipped bit
//!   fails decryption outright, it never yields garbage plaintext.
//!
//! # Module layout
//! - `blob`  - the self-describing `salt || nonce || ciphertext+tag` wire format
//! - `kdf`   - PBKDF2-HMAC-SHA256 password stretching + HKDF session-key expansion
//! - `aead`  - AES-256-GCM seal/open over the blob format
//! - `error` - unified error type

pub mod aead;
pub mod blob;
pub mod error;
pub mod kdf;

pub use blob::EncryptedBlob;
pub use error::CryptoError;
pub use kdf::SessionKey;
