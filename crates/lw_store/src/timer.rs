//! Delayed-callback timer collaborator.
//!
//! Models the extension host's alarm API (`chrome.alarms`): arm a named
//! one-shot callback, optionally disarm it before it fires. The contract the
//! session manager relies on:
//! - a callback fires at most once per arm call;
//! - re-arming a name replaces the pending callback;
//! - disarming a name that already fired, or was never armed, is a no-op.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Boxed future run when a timer fires.
pub type ExpiryHook = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

#[async_trait]
pub trait ExpiryTimer: Send + Sync {
    async fn arm(&self, name: &str, delay: Duration, on_fire: ExpiryHook);
    async fn disarm(&self, name: &str);
}

/// Timer backed by spawned tokio tasks, keyed by name.
#[derive(Default)]
pub struct TokioTimer {
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl TokioTimer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpiryTimer for TokioTimer {
    async fn arm(&self, name: &str, delay: Duration, on_fire: ExpiryHook) {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire.await;
        });
        if let Some(previous) = self.tasks.lock().await.insert(name.to_string(), task) {
            // Aborting a finished task is a no-op.
            previous.abort();
        }
    }

    async fn disarm(&self, name: &str) {
        if let Some(task) = self.tasks.lock().await.remove(name) {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counting_hook(counter: &Arc<AtomicU32>) -> ExpiryHook {
        let counter = counter.clone();
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_delay() {
        let timer = TokioTimer::new();
        let fired = Arc::new(AtomicU32::new(0));
        timer
            .arm("t", Duration::from_secs(60), counting_hook(&fired))
            .await;

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_cancels_and_is_idempotent() {
        let timer = TokioTimer::new();
        let fired = Arc::new(AtomicU32::new(0));
        timer
            .arm("t", Duration::from_secs(10), counting_hook(&fired))
            .await;
        timer.disarm("t").await;
        timer.disarm("t").await;
        timer.disarm("never-armed").await;

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_replaces_the_pending_callback() {
        let timer = TokioTimer::new();
        let first = Arc::new(AtomicU32::new(0));
        let second = Arc::new(AtomicU32::new(0));
        timer
            .arm("t", Duration::from_secs(10), counting_hook(&first))
            .await;
        timer
            .arm("t", Duration::from_secs(30), counting_hook(&second))
            .await;

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }
}
