// ── Central reactive entity store ──
//
// Holds the current `FleetSnapshot` behind a `watch` channel. Readers
// always see a whole snapshot; refreshes replace it wholesale.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;

use super::FleetSnapshot;
use crate::stream::FleetStream;

/// Reactive store for the fleet tree.
///
/// Each refresh takes a generation number up front via
/// [`begin_refresh`](Self::begin_refresh). Its result is applied only if
/// no later refresh has started, so a slow response can never overwrite
/// fresher data.
pub struct EntityStore {
    snapshot: watch::Sender<Arc<FleetSnapshot>>,
    issued: AtomicU64,
}

impl EntityStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(FleetSnapshot::default()));
        Self {
            snapshot,
            issued: AtomicU64::new(0),
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<FleetSnapshot> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> FleetStream {
        FleetStream::new(self.snapshot.subscribe())
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.snapshot.borrow().refreshed_at
    }

    // ── Generations ──────────────────────────────────────────────────

    /// Reserve the next refresh generation.
    pub fn begin_refresh(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Latest generation handed out.
    pub fn latest_generation(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Replace the snapshot if it is still the latest refresh.
    ///
    /// Returns `false` (and notifies nobody) for a stale result.
    pub(crate) fn apply(&self, snapshot: FleetSnapshot) -> bool {
        let generation = snapshot.generation;
        let latest = self.latest_generation();
        let applied = self.snapshot.send_if_modified(move |current| {
            if generation != latest || generation <= current.generation {
                return false;
            }
            *current = Arc::new(snapshot);
            true
        });
        if !applied {
            debug!(generation, latest, "discarding stale refresh result");
        }
        applied
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SnapshotBuilder;

    fn snapshot(generation: u64) -> FleetSnapshot {
        SnapshotBuilder::new(generation, Vec::new()).finish().0
    }

    #[test]
    fn starts_empty_and_unrefreshed() {
        let store = EntityStore::new();
        assert!(store.snapshot().is_empty());
        assert!(store.last_refresh().is_none());
        assert_eq!(store.snapshot().generation(), 0);
    }

    #[test]
    fn latest_refresh_is_applied() {
        let store = EntityStore::new();
        let generation = store.begin_refresh();
        assert!(store.apply(snapshot(generation)));
        assert_eq!(store.snapshot().generation(), generation);
        assert!(store.last_refresh().is_some());
    }

    #[test]
    fn stale_refresh_is_discarded() {
        let store = EntityStore::new();
        let older = store.begin_refresh();
        let newer = store.begin_refresh();

        assert!(store.apply(snapshot(newer)));
        assert!(!store.apply(snapshot(older)));
        assert_eq!(store.snapshot().generation(), newer);
    }

    #[test]
    fn older_result_is_discarded_even_if_it_lands_first() {
        let store = EntityStore::new();
        let older = store.begin_refresh();
        let _newer = store.begin_refresh();

        assert!(!store.apply(snapshot(older)));
        assert_eq!(store.snapshot().generation(), 0);
    }

    #[test]
    fn subscribers_see_applied_snapshots_only() {
        let store = EntityStore::new();
        let stream = store.subscribe();
        let older = store.begin_refresh();
        let newer = store.begin_refresh();

        store.apply(snapshot(older));
        assert!(!stream.has_changed());
        store.apply(snapshot(newer));
        assert!(stream.has_changed());
        assert_eq!(stream.latest().generation(), newer);
    }
}
