//! Cancellation scope tied to the lifetime of a presentation context.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Cloneable cancellation token. All clones observe the same cancellation.
///
/// The owner calls `cancel()` on teardown; fetches running under the scope
/// stop waiting on the network and discard any late result.
#[derive(Debug, Clone, Default)]
pub struct FetchScope {
    inner: Arc<ScopeInner>,
}

#[derive(Debug, Default)]
struct ScopeInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl FetchScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the scope. Only the first call wakes waiters and returns true.
    pub fn cancel(&self) -> bool {
        let first = !self.inner.cancelled.swap(true, Ordering::SeqCst);
        if first {
            self.inner.notify.notify_waiters();
        }
        first
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once the scope is cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking the flag so a concurrent cancel is not missed.
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
