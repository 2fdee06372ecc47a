use std::time::Duration;

use tokio::{sync::mpsc, task::AbortHandle};
use tracing::trace;

pub const DEBOUNCE_QUIET: Duration = Duration::from_millis(800);

/// A debounced payload whose quiet period elapsed. Hand it back to
/// [`Debouncer::accept`] to find out whether it is still the current one.
#[derive(Debug, Clone)]
pub struct Settled<T> {
    generation: u64,
    payload: T,
}

impl<T> Settled<T> {
    pub fn payload(&self) -> &T {
        &self.payload
    }
}

/// Single-slot deferred action. At most one payload is pending at any time;
/// scheduling a new one cancels and replaces the previous.
///
/// The timer runs as a tokio task that only posts to a channel, so the owner
/// of the receiver decides when the action actually runs. Each schedule or
/// cancel bumps a generation counter, which lets [`accept`](Self::accept)
/// drop a message that was already in flight when it was superseded.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    generation: u64,
    pending: Option<AbortHandle>,
    tx: mpsc::UnboundedSender<Settled<T>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<Settled<T>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let d = Self {
            quiet,
            generation: 0,
            pending: None,
            tx,
        };
        (d, rx)
    }

    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, payload: T) {
        self.cancel();
        let generation = self.generation;
        let quiet = self.quiet;
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            // receiver gone means the owner shut down
            let _ = tx.send(Settled {
                generation,
                payload,
            });
        });
        trace!(target: "reso", generation, "debounce armed");
        self.pending = Some(handle.abort_handle());
    }

    /// Drop the pending action, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.generation = self.generation.wrapping_add(1);
        match self.pending.take() {
            Some(h) => {
                h.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Claim a settled payload. `None` when it was superseded or cancelled.
    pub fn accept(&mut self, settled: Settled<T>) -> Option<T> {
        if self.pending.is_none() || settled.generation != self.generation {
            trace!(target: "reso", stale = settled.generation, current = self.generation, "debounce dropped");
            return None;
        }
        self.pending = None;
        Some(settled.payload)
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(h) = self.pending.take() {
            h.abort();
        }
    }
}
