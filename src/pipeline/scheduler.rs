// file: src/pipeline/scheduler.rs
// description: periodic sync loop with cooperative shutdown
// reference: https://docs.rs/tokio/latest/tokio/time/struct.Interval.html

use crate::pipeline::service::SyncService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Runs one pass immediately, then one per interval. Passes never overlap:
/// a tick that arrives while a pass is running is delayed until it ends.
pub struct Scheduler {
    service: Arc<SyncService>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(service: Arc<SyncService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    /// Returns once `shutdown` fires or its sender is dropped. An in-flight
    /// pass is abandoned without publishing.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        info!("Scheduler started (interval {:?})", self.interval);

        if !self.pass_or_shutdown(&mut shutdown).await {
            info!("Scheduler stopped during startup sync");
            return;
        }

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await; // consume the first immediate tick

        loop {
            let ticked = tokio::select! {
                _ = shutdown.recv() => false,
                _ = interval.tick() => true,
            };
            if !ticked || !self.pass_or_shutdown(&mut shutdown).await {
                break;
            }
        }

        info!("Scheduler stopped");
    }

    /// False when shutdown won the race against the pass.
    async fn pass_or_shutdown(&self, shutdown: &mut broadcast::Receiver<()>) -> bool {
        tokio::select! {
            _ = shutdown.recv() => {
                warn!("Shutdown requested; abandoning in-flight sync");
                false
            }
            result = self.service.run_pass() => {
                if let Ok(stats) = result {
                    stats.log_summary("scheduled pass");
                }
                info!("{}", self.service.cache().status().summary());
                true
            }
        }
    }
}
