//! Periodic eviction of finished download jobs.
//!
//! Only started when `JOB_RETENTION_SECS` is configured. Jobs that reached
//! `completed` or `error` more than the retention period ago are dropped
//! from the registry; running jobs are never touched.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use ytgrab_core::registry::JobRegistry;

/// Longest pause between two sweeps.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Sweep interval for a given retention: a quarter of it, at most a minute.
pub fn sweep_interval(retention: Duration) -> Duration {
    (retention / 4).clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL)
}

/// Remove jobs that finished more than `retention` ago. Returns the count.
pub async fn sweep(registry: &JobRegistry, retention: Duration) -> usize {
    let retention = chrono::Duration::from_std(retention).unwrap_or(chrono::Duration::MAX);
    let cutoff = Utc::now()
        .checked_sub_signed(retention)
        .unwrap_or(chrono::DateTime::<Utc>::MIN_UTC);
    registry.purge_finished_before(cutoff).await
}

/// Run the retention loop until `cancel` is triggered.
pub async fn run(registry: Arc<JobRegistry>, retention: Duration, cancel: CancellationToken) {
    let period = sweep_interval(retention);

    tracing::info!(
        retention_secs = retention.as_secs(),
        interval_secs = period.as_secs(),
        "Job retention task started"
    );

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Job retention task stopping");
                break;
            }
            _ = interval.tick() => {
                let removed = sweep(&registry, retention).await;
                if removed > 0 {
                    tracing::info!(removed, "Job retention: evicted finished jobs");
                } else {
                    tracing::debug!("Job retention: nothing to evict");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ytgrab_core::output::OutputEvent;

    #[test]
    fn interval_is_bounded() {
        assert_eq!(sweep_interval(Duration::from_secs(2)), Duration::from_secs(1));
        assert_eq!(sweep_interval(Duration::from_secs(40)), Duration::from_secs(10));
        assert_eq!(sweep_interval(Duration::from_secs(86_400)), MAX_SWEEP_INTERVAL);
    }

    #[tokio::test]
    async fn zero_retention_evicts_finished_jobs_only() {
        let registry = JobRegistry::new();
        let done = registry.create().await;
        let running = registry.create().await;
        registry.complete(&done).await;
        registry
            .apply(&running, &OutputEvent::Progress { percent: 10 })
            .await;

        tokio::time::sleep(Duration::from_millis(5)).await;
        let removed = sweep(&registry, Duration::ZERO).await;

        assert_eq!(removed, 1);
        assert!(registry.get(&done).await.is_none());
        assert!(registry.get(&running).await.is_some());
    }

    #[tokio::test]
    async fn long_retention_keeps_everything() {
        let registry = JobRegistry::new();
        let id = registry.create().await;
        registry.fail(&id).await;

        assert_eq!(sweep(&registry, Duration::from_secs(3600)).await, 0);
        assert_eq!(sweep(&registry, Duration::MAX).await, 0);
    }

    #[tokio::test]
    async fn run_stops_on_cancel() {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(
            Arc::new(JobRegistry::new()),
            Duration::from_secs(60),
            cancel.clone(),
        ));
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("task stopped")
            .expect("task did not panic");
    }
}
