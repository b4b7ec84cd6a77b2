// file: src/pipeline/service.rs
// description: runs sync passes and applies the publish rule to the shared cache
// reference: coordinates orchestrator, snapshot cache, and disk mirror

use crate::cache::SnapshotCache;
use crate::config::Config;
use crate::error::{MirrorError, Result};
use crate::mirror::DiskMirror;
use crate::models::{Snapshot, SnapshotOrigin};
use crate::pipeline::orchestrator::{SyncOrchestrator, should_publish};
use crate::pipeline::stats::SyncStats;
use crate::remote::ContentSource;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct SyncService {
    orchestrator: SyncOrchestrator,
    cache: Arc<SnapshotCache>,
    mirror: Option<DiskMirror>,
}

impl SyncService {
    pub fn new(
        orchestrator: SyncOrchestrator,
        cache: Arc<SnapshotCache>,
        mirror: Option<DiskMirror>,
    ) -> Self {
        Self {
            orchestrator,
            cache,
            mirror,
        }
    }

    pub fn from_config(
        config: &Config,
        source: Arc<dyn ContentSource>,
        cache: Arc<SnapshotCache>,
    ) -> Self {
        let mirror = config
            .mirror
            .enabled
            .then(|| DiskMirror::new(config.mirror.dir.clone(), config.remote.label()));
        let orchestrator = SyncOrchestrator::from_config(config, source);
        Self::new(orchestrator, cache, mirror)
    }

    pub fn cache(&self) -> &Arc<SnapshotCache> {
        &self.cache
    }

    /// Seeds the cache from the disk mirror. Returns the number of posts
    /// published, zero when there is no usable mirror.
    pub async fn restore_from_mirror(&self) -> usize {
        let Some(mirror) = &self.mirror else {
            return 0;
        };

        match mirror.load(self.orchestrator.transformer()).await {
            Ok(contents) if contents.posts.is_empty() => {
                warn!("Disk mirror at {:?} holds no restorable posts", mirror.dir());
                0
            }
            Ok(contents) => {
                let snapshot = self.cache.publish(contents.into_snapshot());
                snapshot.len()
            }
            Err(MirrorError::MirrorNotFound(dir)) => {
                info!("No disk mirror at {:?}; starting empty", dir);
                0
            }
            Err(e) => {
                warn!("Ignoring disk mirror: {}", e);
                0
            }
        }
    }

    /// Runs one pass. The status is always updated; the snapshot is replaced
    /// only when the pass produced at least one post.
    pub async fn run_pass(&self) -> Result<SyncStats> {
        let result = self.orchestrator.sync_once().await;
        let publish = should_publish(&result);
        let finished_at = Utc::now();

        let output = match result {
            Ok(output) if publish => output,
            other => {
                let error = match other {
                    Err(e) => e,
                    Ok(output) => MirrorError::NothingRendered {
                        candidates: output.stats.files_listed,
                    },
                };
                self.cache
                    .record_attempt(finished_at, Some(error.to_string()), None);
                if error.is_pass_level() {
                    warn!(
                        "Sync of {} failed; keeping previous snapshot: {}",
                        self.orchestrator.source_label(),
                        error
                    );
                } else {
                    error!(
                        "Sync of {} aborted unexpectedly; keeping previous snapshot: {}",
                        self.orchestrator.source_label(),
                        error
                    );
                }
                return Err(error);
            }
        };

        let snapshot = self
            .cache
            .publish(Snapshot::build(output.posts, SnapshotOrigin::Remote));
        self.cache
            .record_attempt(finished_at, None, Some(output.stats.clone()));

        if let Some(mirror) = &self.mirror {
            if let Err(e) = mirror.save(&snapshot, &output.bodies).await {
                error!("Failed to update disk mirror: {}", e);
            }
        }

        Ok(output.stats)
    }
}
