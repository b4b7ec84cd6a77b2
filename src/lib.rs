// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod cache;
pub mod config;
pub mod error;
pub mod mirror;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod remote;
pub mod utils;

pub use cache::{SnapshotCache, SyncStatus};
pub use config::{Config, ContentConfig, MirrorConfig, RemoteConfig, SchedulerConfig};
pub use error::{MirrorError, Result};
pub use mirror::{DiskMirror, MirrorContents};
pub use models::{DiskManifest, ManifestEntry, Post, Snapshot, SnapshotOrigin};
pub use parser::{MarkdownRenderer, PostTransformer, slugify};
pub use pipeline::{Scheduler, SyncOrchestrator, SyncOutput, SyncService, SyncStats, should_publish};
pub use remote::{ContentSource, GitHubClient};
pub use utils::{HealthStatus, OperationTimer, Validator};
