// file: src/cache/snapshot_cache.rs
// description: atomically swappable snapshot plus independently updated sync status
// reference: https://doc.rust-lang.org/std/sync/struct.RwLock.html

use crate::cache::SyncStatus;
use crate::models::{Post, Snapshot};
use crate::pipeline::SyncStats;
use crate::utils::HealthStatus;
use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// The only mutable state shared between the sync path and readers.
///
/// Both locks are held just long enough to clone or swap a value, so a reader
/// sees either the whole previous snapshot or the whole new one. Share it as
/// `Arc<SnapshotCache>`.
#[derive(Debug)]
pub struct SnapshotCache {
    snapshot: RwLock<Arc<Snapshot>>,
    status: RwLock<SyncStatus>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::empty())),
            status: RwLock::new(SyncStatus::default()),
        }
    }

    pub fn read(&self) -> (Arc<Snapshot>, SyncStatus) {
        (self.snapshot(), self.status())
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn status(&self) -> SyncStatus {
        self.status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, slug: &str) -> Option<Post> {
        self.snapshot().get(slug).cloned()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.snapshot().posts().to_vec()
    }

    /// Replaces the published snapshot as a unit.
    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let next = Arc::new(snapshot);
        info!(
            "Publishing snapshot with {} posts ({:?})",
            next.len(),
            next.origin()
        );
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&next);
        next
    }

    /// Records a sync attempt. Independent of whether a snapshot was published.
    pub fn record_attempt(
        &self,
        at: DateTime<Utc>,
        error: Option<String>,
        stats: Option<SyncStats>,
    ) {
        self.status
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .record(at, error, stats);
    }

    pub fn health(&self) -> HealthStatus {
        let (snapshot, status) = self.read();
        HealthStatus::evaluate(status.is_failing(), snapshot.len())
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SnapshotOrigin;
    use std::thread;

    fn generation(n: usize) -> Snapshot {
        let posts = (0..n)
            .map(|i| Post {
                slug: format!("gen{}-post{}", n, i),
                title: format!("Post {}", i),
                excerpt: String::new(),
                html: String::new(),
                source_path: format!("data/{:03}.md", i),
            })
            .collect();
        Snapshot::build(posts, SnapshotOrigin::Remote)
    }

    #[test]
    fn test_publish_replaces_snapshot() {
        let cache = SnapshotCache::new();
        assert!(cache.snapshot().is_empty());

        cache.publish(generation(2));
        assert_eq!(cache.posts().len(), 2);
        assert!(cache.get("gen2-post1").is_some());
        assert!(cache.get("unknown").is_none());
    }

    #[test]
    fn test_old_readers_keep_their_snapshot() {
        let cache = SnapshotCache::new();
        cache.publish(generation(1));
        let before = cache.snapshot();

        cache.publish(generation(3));
        assert_eq!(before.len(), 1);
        assert_eq!(cache.snapshot().len(), 3);
    }

    #[test]
    fn test_status_updates_without_publish() {
        let cache = SnapshotCache::new();
        cache.publish(generation(2));
        cache.record_attempt(Utc::now(), Some("HTTP 502".to_string()), None);

        let (snapshot, status) = cache.read();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(status.last_error.as_deref(), Some("HTTP 502"));
        assert_eq!(cache.health(), HealthStatus::Degraded);
    }

    #[test]
    fn test_concurrent_readers_never_see_a_mixed_snapshot() {
        let cache = Arc::new(SnapshotCache::new());
        cache.publish(generation(1));

        let writer = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for n in 1..200 {
                    cache.publish(generation(n % 17 + 1));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let snapshot = cache.snapshot();
                        assert!(snapshot.is_consistent());
                        let expected = snapshot.len();
                        let prefix = format!("gen{}-", expected);
                        assert!(snapshot.posts().iter().all(|p| p.slug.starts_with(&prefix)));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
