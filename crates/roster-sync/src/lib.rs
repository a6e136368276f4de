//! Sync engine for Roster.
//!
//! [`SyncController`] pages through a [`PageFetcher`], accumulates the
//! results and hands them to a [`SnapshotStore`] in one atomic replacement.
//! Progress is published on a `watch` channel; each session ends with
//! exactly one [`SyncEvent`].
//!
//! [`PageFetcher`]: roster_core::store::PageFetcher
//! [`SnapshotStore`]: roster_core::store::SnapshotStore

mod controller;
mod scheduler;
mod status;

pub use controller::{SyncConfig, SyncController};
pub use scheduler::spawn_auto_refresh;
pub use status::{SyncEvent, SyncPhase, SyncStatus};
