//! Cooperative cancellation.
//!
//! Killing an agent is a request, not a pre-emption: the controller flips the
//! agent's signal and the agent's own pacing sleep (or any helper task
//! waiting on the signal) observes it and unwinds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Notify;

/// Marker error: the task was cancelled and must unwind.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cancelled")]
pub struct Cancelled;

/// A one-shot, clonable cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a cancel in between is not missed.
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Sleep for `duration` unless cancelled first.
    pub async fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            return Err(Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_is_an_error() {
        let err: Box<dyn std::error::Error> = Box::new(Cancelled);
        assert_eq!(err.to_string(), "cancelled");
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_completes_without_cancel() {
        let signal = CancelSignal::new();
        assert_eq!(signal.sleep(Duration::from_millis(50)).await, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_sleep() {
        let signal = CancelSignal::new();
        let sleeper = signal.clone();
        let handle = tokio::spawn(async move { sleeper.sleep(Duration::from_secs(3600)).await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        signal.cancel();

        assert_eq!(handle.await.unwrap(), Err(Cancelled));
    }

    #[tokio::test]
    async fn cancelled_before_sleep_fails_fast() {
        let signal = CancelSignal::new();
        signal.cancel();
        signal.cancel();
        assert!(signal.is_cancelled());
        assert_eq!(signal.sleep(Duration::from_secs(3600)).await, Err(Cancelled));
        signal.cancelled().await;
    }
}
