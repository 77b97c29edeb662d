use anyhow::Result;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Fixed-interval retry policy. No backoff, no jitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

pub async fn execute_with_retry<F, Fut, T, E>(
    operation: F,
    retry_config: &RetryConfig,
    operation_name: &str,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>> + Send,
    E: std::fmt::Display + Send + Sync + 'static,
{
    let max_attempts = retry_config.max_attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        if attempt > 1 {
            info!("🔄 {} attempt {}/{}", operation_name, attempt, max_attempts);
        }

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    info!("✅ {} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(e) => {
                warn!("❌ {} failed on attempt {}: {}", operation_name, attempt, e);
                last_error = Some(e.to_string());

                if attempt < max_attempts {
                    info!("⏳ Waiting {:?} before retry...", retry_config.delay);
                    sleep(retry_config.delay).await;
                }
            }
        }
    }

    Err(anyhow::anyhow!(
        "{} failed after {} attempts. Last error: {}",
        operation_name,
        max_attempts,
        last_error.unwrap_or_default()
    ))
}
