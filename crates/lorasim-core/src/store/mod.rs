// ── Reactive fleet store ──
//
// Whole-tree snapshots with push-based change notification.

mod entity_store;
mod refresh;
mod snapshot;

pub use entity_store::EntityStore;
pub use refresh::{RefreshFailure, RefreshReport};
pub use snapshot::FleetSnapshot;

pub(crate) use refresh::SnapshotBuilder;
