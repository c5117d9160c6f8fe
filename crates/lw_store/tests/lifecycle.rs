//! End-to-end flow the extension UI drives: onboarding, login, activity,
//! auto-lock.

use std::sync::Arc;
use std::time::Duration;

use lw_store::{
    MemoryStore, SessionConfig, SessionManager, StoreError, TokioTimer, WalletSecret,
    SESSION_DURATION,
};

fn imported_secret() -> WalletSecret {
    WalletSecret {
        key_data: b"opaque hd-derived private key material".to_vec(),
        public_address: "0x9f8e7d6c".into(),
    }
}

fn manager() -> SessionManager {
    SessionManager::new(
        Arc::new(MemoryStore::new()),
        Arc::new(TokioTimer::new()),
        SessionConfig::default(),
    )
}

#[tokio::test(start_paused = true)]
async fn onboarding_login_activity_autolock() {
    let manager = manager();

    // First run: no wallet yet, the UI routes to onboarding.
    assert!(!manager.vault().exists("w1").await.unwrap());
    let err = manager.unlock("w1", "pw").await.unwrap_err();
    assert!(err.is_missing_wallet());

    // Onboarding wizard imports a wallet.
    manager
        .vault()
        .store("w1", &imported_secret(), "pw")
        .await
        .unwrap();
    assert!(manager.vault().exists("w1").await.unwrap());
    assert!(!manager.is_unlocked("w1").await.unwrap());

    // Login screen: a bad password is reported as such, not as "no wallet".
    let err = manager.unlock("w1", "typo").await.unwrap_err();
    assert!(err.is_wrong_password());
    assert!(!err.is_missing_wallet());

    // Successful login.
    manager.unlock("w1", "pw").await.unwrap();
    assert_eq!(manager.read("w1").await.unwrap(), imported_secret());
    assert_eq!(
        manager.active_public_identity("w1").await.unwrap(),
        "0x9f8e7d6c"
    );

    // Wallet activity keeps the session alive past the original deadline.
    tokio::time::sleep(SESSION_DURATION / 2).await;
    manager.renew("w1").await.unwrap();
    tokio::time::sleep(SESSION_DURATION / 2 + Duration::from_secs(1)).await;
    assert_eq!(manager.read("w1").await.unwrap(), imported_secret());

    // Inactivity: the timer fires and the wallet locks itself.
    tokio::time::sleep(SESSION_DURATION).await;
    assert!(matches!(
        manager.read("w1").await,
        Err(StoreError::Locked(_))
    ));
    assert!(!manager.is_unlocked("w1").await.unwrap());

    // The vault record survives the lock; logging back in works.
    assert!(manager.vault().exists("w1").await.unwrap());
    manager.unlock("w1", "pw").await.unwrap();
    assert_eq!(manager.read("w1").await.unwrap(), imported_secret());
}

#[tokio::test]
async fn explicit_logout_is_immediate_and_repeatable() {
    let manager = manager();
    manager
        .vault()
        .store("w1", &imported_secret(), "pw")
        .await
        .unwrap();

    manager.unlock("w1", "pw").await.unwrap();
    assert!(manager.is_unlocked("w1").await.unwrap());

    manager.lock("w1").await.unwrap();
    manager.lock("w1").await.unwrap();
    assert!(matches!(
        manager.read("w1").await,
        Err(StoreError::Locked(_))
    ));
}
