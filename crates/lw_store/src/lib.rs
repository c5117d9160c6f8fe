//! lw_store - encrypted key vault and session lifecycle for Lumen Wallet
//!
//! # Storage strategy
//! The extension host gives us a plain key-value store and a one-shot alarm
//! scheduler; both are consumed behind traits ([`KeyValueStore`],
//! [`ExpiryTimer`]) so the core stays testable with injected in-memory
//! collaborators.
//!
//! - The vault record is the wallet secret encrypted under the user's
//!   password (PBKDF2 + AES-256-GCM, see `lw_crypto`). It is the sole source
//!   of truth for "a wallet exists".
//! - An unlocked session caches the secret re-encrypted under a random
//!   ephemeral key with a 15-minute expiry; reads never touch the password
//!   again, and the session self-erases when the timer fires.

pub mod error;
pub mod kv;
pub mod models;
pub mod session;
pub mod timer;
pub mod vault;

pub use error::StoreError;
pub use kv::{KeyValueStore, MemoryStore};
pub use models::{SessionRecord, VaultRecord, WalletSecret};
pub use session::{SessionConfig, SessionManager, SESSION_DURATION};
pub use timer::{ExpiryTimer, TokioTimer};
pub use vault::KeyVault;
