// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod orchestrator;
mod scheduler;
mod service;
mod stats;

pub use orchestrator::{SyncOrchestrator, SyncOutput, should_publish};
pub use scheduler::Scheduler;
pub use service::SyncService;
pub use stats::SyncStats;
