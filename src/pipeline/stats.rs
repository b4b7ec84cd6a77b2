// file: src/pipeline/stats.rs
// description: per-pass counters for sync execution
// reference: tracks processing metrics for one sync pass

use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub files_listed: usize,
    pub files_fetched: usize,
    pub fetch_failures: usize,
    pub render_failures: usize,
    pub posts_rendered: usize,
    pub duration_ms: u64,
}

impl SyncStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files_failed(&self) -> usize {
        self.fetch_failures + self.render_failures
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_listed == 0 {
            return 0.0;
        }
        (self.posts_rendered as f64 / self.files_listed as f64) * 100.0
    }

    pub fn log_summary(&self, label: &str) {
        info!("=== Sync Summary: {} ===", label);
        info!("Files listed: {}", self.files_listed);
        info!("Files fetched: {}", self.files_fetched);
        info!(
            "Failures: {} fetch, {} render",
            self.fetch_failures, self.render_failures
        );
        info!("Posts rendered: {}", self.posts_rendered);
        info!("Success rate: {:.2}%", self.success_rate());
        info!("Duration: {} ms", self.duration_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_stats_calculations() {
        let stats = SyncStats {
            files_listed: 10,
            files_fetched: 9,
            fetch_failures: 1,
            render_failures: 1,
            posts_rendered: 8,
            duration_ms: 120,
        };

        assert_eq!(stats.files_failed(), 2);
        assert!((stats.success_rate() - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sync_stats_empty() {
        let stats = SyncStats::new();
        assert_eq!(stats.success_rate(), 0.0);
        assert_eq!(stats.files_failed(), 0);
    }
}
