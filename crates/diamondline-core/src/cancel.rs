//! Cooperative cancellation for long-running operations.
//!
//! A [`CancellationSource`] owns the signal; every operation that talks to an
//! external collaborator receives a cheap [`CancellationToken`] clone and
//! races its calls against it with [`CancellationToken::run`]. Work already
//! applied when the signal fires is left as it is.

use std::future::Future;

use thiserror::Error;
use tokio::sync::watch;

/// Returned when a cancellation signal won the race against an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Owner of a cancellation signal.
#[derive(Debug)]
pub struct CancellationSource {
    tx: watch::Sender<bool>,
}

impl CancellationSource {
    /// Creates a source whose signal has not been raised.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Returns a token observing this source.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Raises the signal. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a [`CancellationSource`].
#[derive(Debug, Clone)]
pub struct CancellationToken {
    rx: watch::Receiver<bool>,
}

impl CancellationToken {
    /// A token that is never cancelled.
    #[must_use]
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    /// Returns `true` if the signal has been raised.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes once the signal is raised. Pends forever if the source is
    /// dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Drives `fut` to completion unless the signal is raised first.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if the signal is (or becomes) raised before
    /// `fut` completes. An already-raised signal wins without polling `fut`.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Cancelled>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            () = self.cancelled() => Err(Cancelled),
            output = fut => Ok(output),
        }
    }
}
