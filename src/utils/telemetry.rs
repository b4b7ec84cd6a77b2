// file: src/utils/telemetry.rs
// description: Telemetry and observability utilities for sync passes
// reference: Production observability best practices

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::info;

/// Health of the mirrored content as seen by readers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HealthStatus {
    /// The last sync attempt succeeded.
    Healthy,
    /// The last attempt failed but a previous snapshot is still served.
    Degraded,
    /// The last attempt failed and there is nothing to serve.
    Unhealthy,
}

impl HealthStatus {
    pub fn evaluate(has_error: bool, post_count: usize) -> Self {
        match (has_error, post_count) {
            (false, _) => HealthStatus::Healthy,
            (true, 0) => HealthStatus::Unhealthy,
            (true, _) => HealthStatus::Degraded,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "✓",
            HealthStatus::Degraded => "⚠",
            HealthStatus::Unhealthy => "✗",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        };
        f.write_str(label)
    }
}

/// Operation timer for performance tracking
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        info!("Starting operation: {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} in {:.2}s",
            self.operation,
            elapsed.as_secs_f64()
        );
        elapsed
    }

    pub fn finish_with_count(self, count: usize) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} - {} items in {:.2}s ({:.2} items/sec)",
            self.operation,
            count,
            elapsed.as_secs_f64(),
            if elapsed.as_secs_f64() > 0.0 {
                count as f64 / elapsed.as_secs_f64()
            } else {
                0.0
            }
        );
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_evaluation() {
        assert_eq!(HealthStatus::evaluate(false, 0), HealthStatus::Healthy);
        assert_eq!(HealthStatus::evaluate(true, 3), HealthStatus::Degraded);
        assert_eq!(HealthStatus::evaluate(true, 0), HealthStatus::Unhealthy);
        assert_eq!(HealthStatus::Degraded.to_string(), "degraded");
    }

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("test");
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = timer.finish();
        assert!(elapsed >= Duration::from_millis(10));
    }
}
