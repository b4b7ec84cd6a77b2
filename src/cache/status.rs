// file: src/cache/status.rs
// description: outcome of the most recent sync attempt
// reference: internal data structures

use crate::pipeline::SyncStats;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncStatus {
    /// Most recent attempt, successful or not.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Error of the most recent attempt; cleared by the next success.
    pub last_error: Option<String>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_stats: Option<SyncStats>,
}

impl SyncStatus {
    pub fn record(
        &mut self,
        at: DateTime<Utc>,
        error: Option<String>,
        stats: Option<SyncStats>,
    ) {
        self.last_sync_at = Some(at);
        if error.is_none() {
            self.last_success_at = Some(at);
        }
        self.last_error = error;
        if stats.is_some() {
            self.last_stats = stats;
        }
    }

    pub fn is_failing(&self) -> bool {
        self.last_error.is_some()
    }

    /// One-line summary for status output, e.g. `last sync 2024-05-01 10:00:00 UTC (ok)`.
    pub fn summary(&self) -> String {
        let when = self
            .last_sync_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "never".to_string());

        match &self.last_error {
            Some(error) => format!("last sync {} (failed: {})", when, error),
            None if self.last_sync_at.is_some() => format!("last sync {} (ok)", when),
            None => "no sync attempted yet".to_string(),
        }
    }
}
