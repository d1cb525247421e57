//! Caller-driven cancellation of in-flight fetches and retry waits.

use std::future::Future;

use tokio::sync::watch;

use crate::error::FetchError;

/// Triggers cancellation for every [`CancelToken`] created alongside it.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observes a [`CancelHandle`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Creates a linked handle/token pair.
    #[must_use]
    pub fn pair() -> (CancelHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, Self { rx })
    }

    /// A token that can never be cancelled.
    #[must_use]
    pub fn never() -> Self {
        let (_handle, token) = Self::pair();
        token
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested. Pends forever if the handle
    /// was dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Runs `fut` to completion unless cancellation is requested first, in
    /// which case `fut` is dropped and [`FetchError::Cancelled`] returned.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Cancelled`] on cancellation, otherwise whatever
    /// `fut` returns.
    pub async fn guard<T, Fut>(&self, fut: Fut) -> Result<T, FetchError>
    where
        Fut: Future<Output = Result<T, FetchError>>,
    {
        tokio::select! {
            biased;
            () = self.cancelled() => Err(FetchError::Cancelled),
            result = fut => result,
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::never()
    }
}
