//! Explicit cancellation for in-flight check-in work.
//!
//! A screen owns one [`CancelHandle`] and hands [`CancelToken`]s to everything
//! that suspends. Cancelling the handle (or dropping it when the screen goes
//! away) resolves every token, and [`CancelToken::guard`] turns the pending
//! operation into [`Cancelled`].

use std::future::Future;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Owner side of a cancellation signal.
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Get a token observing this handle.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Cancel all outstanding work.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a cancellation signal.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// True once the handle cancelled or was dropped.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolve once the handle cancels or is dropped.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // An error means the handle was dropped, which also counts.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Run `fut` unless cancellation arrives first.
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, Cancelled> {
        if self.is_cancelled() {
            return Err(Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(Cancelled),
            out = fut => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn guard_passes_output_through() {
        let handle = CancelHandle::new();
        let token = handle.token();
        assert_eq!(token.guard(async { 7 }).await, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_pending_work() {
        let handle = CancelHandle::new();
        let token = handle.token();
        let work = tokio::spawn(async move {
            token
                .guard(tokio::time::sleep(Duration::from_secs(60)))
                .await
        });
        tokio::task::yield_now().await;
        handle.cancel();
        assert_eq!(work.await.unwrap(), Err(Cancelled));
    }

    #[tokio::test]
    async fn dropping_handle_cancels() {
        let handle = CancelHandle::new();
        let token = handle.token();
        drop(handle);
        assert!(token.is_cancelled());
        assert_eq!(token.guard(async { 1 }).await, Err(Cancelled));
    }

    #[tokio::test]
    async fn all_tokens_observe_cancel() {
        let handle = CancelHandle::new();
        let a = handle.token();
        let b = a.clone();
        handle.cancel();
        assert!(handle.is_cancelled());
        assert!(a.is_cancelled());
        b.cancelled().await;
    }
}
