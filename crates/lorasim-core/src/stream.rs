// ── Reactive fleet stream ──
//
// Subscription type for consuming snapshot changes from the EntityStore.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::FleetSnapshot;

/// A subscription to the fleet tree.
///
/// Provides both point-in-time snapshot access and change notification
/// via [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct FleetStream {
    current: Arc<FleetSnapshot>,
    receiver: watch::Receiver<Arc<FleetSnapshot>>,
}

impl FleetStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<FleetSnapshot>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation (or at the last `changed()`).
    pub fn current(&self) -> &Arc<FleetSnapshot> {
        &self.current
    }

    /// The latest snapshot, which may be newer than `current()`.
    pub fn latest(&self) -> Arc<FleetSnapshot> {
        self.receiver.borrow().clone()
    }

    /// Whether a snapshot was applied since the last `changed()`.
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Wait for the next applied refresh, returning the new snapshot.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<FleetSnapshot>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` that yields the current snapshot first,
    /// then every subsequently applied one.
    pub fn into_stream(self) -> FleetWatchStream {
        FleetWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct FleetWatchStream {
    inner: WatchStream<Arc<FleetSnapshot>>,
}

impl Stream for FleetWatchStream {
    type Item = Arc<FleetSnapshot>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
