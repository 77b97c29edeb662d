use chrono::Local;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Repeats a job on a fixed wall-clock interval until cancelled.
///
/// A failed run is logged and the timer re-armed; the loop only ends through
/// its cancellation token.
pub struct DailyScheduler {
    interval: Duration,
    cancel: CancellationToken,
}

impl DailyScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            cancel: CancellationToken::new(),
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs `job` immediately, then once per interval. Returns the number of runs.
    pub async fn run<F, Fut, T>(&self, mut job: F) -> usize
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        info!("🕐 Scheduler started at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        let mut runs = 0;

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            info!("▶️ Running scheduled task at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
            let outcome = tokio::select! {
                _ = self.cancel.cancelled() => break,
                outcome = job() => outcome,
            };
            runs += 1;

            match outcome {
                Ok(_) => info!("✅ Scheduled run {} completed", runs),
                Err(e) => error!("❌ Scheduled run {} failed: {:#}", runs, e),
            }

            let next = Local::now()
                + chrono::Duration::from_std(self.interval).unwrap_or(chrono::Duration::zero());
            info!("⏳ Next run at {}", next.format("%Y-%m-%d %H:%M:%S"));

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!("🛑 Scheduler stopped after {} runs", runs);
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_failed_runs_rearm_the_timer() {
        let scheduler = DailyScheduler::new(Duration::from_millis(5));
        let token = scheduler.cancellation_token();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let runs = scheduler
            .run(move || {
                let counter = counter.clone();
                let token = token.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    if n == 3 {
                        token.cancel();
                    }
                    Err::<(), _>(anyhow::anyhow!("run {} failed", n))
                }
            })
            .await;

        assert_eq!(runs, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cancel_during_wait_stops_loop() {
        let scheduler = DailyScheduler::new(Duration::from_secs(3600));
        let token = scheduler.cancellation_token();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let runs = scheduler.run(|| async { Ok::<_, anyhow::Error>(()) }).await;
        handle.await.unwrap();
        assert_eq!(runs, 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_runs_nothing() {
        let scheduler = DailyScheduler::new(Duration::from_millis(1));
        scheduler.cancellation_token().cancel();
        let runs = scheduler.run(|| async { Ok::<_, anyhow::Error>(()) }).await;
        assert_eq!(runs, 0);
    }
}
