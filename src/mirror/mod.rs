// file: src/mirror/mod.rs
// description: optional on-disk copy of the last published snapshot
// reference: internal module structure

pub mod disk;

pub use disk::{DiskMirror, MANIFEST_FILE, MirrorContents};
