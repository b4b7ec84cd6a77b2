// file: src/models/mod.rs
// description: data model module exports
// reference: internal module structure

pub mod manifest;
pub mod post;
pub mod snapshot;

pub use manifest::{DiskManifest, ManifestEntry};
pub use post::Post;
pub use snapshot::{Snapshot, SnapshotOrigin};
