// file: src/cache/mod.rs
// description: published snapshot cache shared between the sync path and readers
// reference: internal module structure

pub mod snapshot_cache;
pub mod status;

pub use snapshot_cache::SnapshotCache;
pub use status::SyncStatus;
