use crate::accounts::{load_private_keys, load_proxies};
use crate::batch::{BatchRunner, BatchSummary};
use crate::chain::{Deployment, LiveConnector};
use crate::config::BotConfig;
use crate::runner::{RunOptions, RunnerSettings};
use crate::vote_plan::VotePlan;
use anyhow::Result;
use std::time::Duration;
use tracing::info;

/// One pass over every account in the key file.
pub struct AccountBatchJob {
    config: BotConfig,
    options: RunOptions,
}

impl AccountBatchJob {
    pub fn new(config: BotConfig, options: RunOptions) -> Self {
        Self { config, options }
    }

    pub async fn execute(&self) -> Result<BatchSummary> {
        info!("🔍 Account batch job starting ({:?})", self.options);

        // A missing or malformed key file aborts before any account is touched
        let accounts = load_private_keys(&self.config.files.private_keys)?;
        let proxies = load_proxies(&self.config.files.proxies);

        let connector = LiveConnector::new(
            self.config.retry_config(),
            Duration::from_secs(self.config.monitoring.transaction_timeout_seconds),
            Duration::from_secs(self.config.monitoring.poll_interval_seconds),
        );
        let runner = BatchRunner::new(
            connector,
            Deployment::default(),
            VotePlan::default(),
            RunnerSettings::from_config(&self.config)?,
        );

        let summary = runner.run(&accounts, &proxies, self.options).await;
        println!("\n{}", summary);
        Ok(summary)
    }
}
