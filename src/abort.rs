//! Cancellation for requests issued by a mounted view.
//!
//! One controller per view. Every request receives a clone of its signal and
//! resolves to [`UsersError::Cancelled`] once the controller fires or is dropped.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{Result, UsersError};

#[derive(Clone)]
pub struct AbortController {
    tx: Arc<watch::Sender<bool>>,
}

#[derive(Clone)]
pub struct AbortSignal {
    rx: watch::Receiver<bool>,
}

impl AbortController {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Fire the signal. Idempotent.
    pub fn abort(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_aborted(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortSignal {
    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once the signal fires or its controller is gone.
    pub async fn aborted(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|aborted| *aborted).await;
    }

    /// Race `fut` against the signal.
    pub async fn guard<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_aborted() {
            return Err(UsersError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.aborted() => Err(UsersError::Cancelled),
            res = fut => res,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guard_passes_result_through() {
        let controller = AbortController::new();
        let signal = controller.signal();
        let value = signal.guard(async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_guard_cancels_pending_future() {
        let controller = AbortController::new();
        let signal = controller.signal();
        let (_tx, rx) = tokio::sync::oneshot::channel::<()>();

        let pending = signal.guard(async move {
            let _ = rx.await;
            Ok(())
        });
        controller.abort();

        let err = pending.await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_guard_rejects_after_abort() {
        let controller = AbortController::new();
        controller.abort();
        let err = controller.signal().guard(async { Ok(()) }).await.unwrap_err();
        assert!(err.is_cancelled());
        assert!(controller.is_aborted());
    }

    #[tokio::test]
    async fn test_dropped_controller_counts_as_aborted() {
        let signal = AbortController::new().signal();
        assert!(signal.is_aborted());
        signal.aborted().await;
    }
}
