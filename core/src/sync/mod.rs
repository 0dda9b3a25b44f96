//! Connection Sync Engine (spec §4.1)

pub mod engine;
pub mod source;

pub use engine::{eligible_expenses, eligible_income, merge_payload, sync, SyncError, SyncReport};
pub use source::{FileSnapshotSource, InMemorySnapshotSource, SnapshotLoadError, SnapshotSource};
