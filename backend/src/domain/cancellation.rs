//! Cooperative cancellation for dispatched requests.
//!
//! One [`CancellationSignal`] is created per inbound request and cloned into
//! the request context. Handlers check it before each gateway call and race
//! slow reads against it; a cancelled request never reaches commit.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use super::Fault;

/// Shared, clonable cancellation flag.
///
/// # Examples
/// ```
/// use activities_backend::domain::CancellationSignal;
///
/// let signal = CancellationSignal::new();
/// let observer = signal.clone();
/// signal.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl Default for CancellationSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationSignal {
    /// Fresh, uncancelled signal.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Cancel every clone of this signal. Repeated calls are no-ops.
    pub fn cancel(&self) {
        self.sender.send_if_modified(|cancelled| !std::mem::replace(cancelled, true));
    }

    /// Whether any clone has called [`cancel`](Self::cancel).
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolve once the signal is cancelled.
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close while waiting.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }

    /// `Err(Fault::Cancelled)` once the signal has fired.
    pub fn ensure_active(&self) -> Result<(), Fault> {
        if self.is_cancelled() {
            Err(Fault::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Drive `fut` to completion unless cancellation wins the race.
    pub async fn run_until_cancelled<F>(&self, fut: F) -> Result<F::Output, Fault>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            () = self.cancelled() => Err(Fault::Cancelled),
            output = fut => Ok(output),
        }
    }

    /// Guard that cancels this signal when dropped unless disarmed.
    #[must_use]
    pub fn cancel_on_drop(&self) -> CancelOnDrop {
        CancelOnDrop {
            signal: Some(self.clone()),
        }
    }
}

/// Cancels its signal on drop. Used by transports to turn an abandoned
/// request future into a cancellation.
#[derive(Debug)]
pub struct CancelOnDrop {
    signal: Option<CancellationSignal>,
}

impl CancelOnDrop {
    /// Consume the guard without cancelling.
    pub fn disarm(mut self) {
        self.signal = None;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(signal) = self.signal.take() {
            signal.cancel();
        }
    }
}
