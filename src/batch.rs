use crate::accounts::Account;
use crate::chain::{ChainConnector, Deployment};
use crate::proxy::{assign_proxy, ProxyDescriptor};
use crate::runner::{AccountReport, AccountRunner, OperationOutcome, RunOptions, RunnerSettings};
use crate::vote_plan::VotePlan;
use std::fmt;
use tokio::time::sleep;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationTally {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl OperationTally {
    pub fn record(&mut self, outcome: OperationOutcome) {
        match outcome {
            OperationOutcome::Succeeded => self.succeeded += 1,
            OperationOutcome::Failed => self.failed += 1,
            OperationOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub claim: OperationTally,
    pub vote: OperationTally,
}

impl BatchSummary {
    pub fn record(&mut self, report: &AccountReport) {
        self.total += 1;
        self.claim.record(report.claim);
        self.vote.record(report.vote);
    }

    /// Every account lands in exactly one bucket per operation kind.
    pub fn is_consistent(&self) -> bool {
        self.claim.total() == self.total && self.vote.total() == self.total
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "================================")?;
        writeln!(f, "SUMMARY:")?;
        if self.claim.skipped == self.total {
            writeln!(f, "Token claiming was skipped")?;
        } else {
            writeln!(f, "Successful claims: {}/{}", self.claim.succeeded, self.total)?;
            writeln!(f, "Failed claims: {}/{}", self.claim.failed, self.total)?;
        }
        if self.vote.skipped == self.total {
            writeln!(f, "Project voting was skipped")?;
        } else {
            writeln!(f, "Successful votes: {}/{}", self.vote.succeeded, self.total)?;
            writeln!(f, "Failed votes: {}/{}", self.vote.failed, self.total)?;
        }
        write!(f, "All accounts processed!")
    }
}

/// Drives accounts one after another. Never concurrent: one account at a
/// time keeps nonces and faucet rate limits out of each other's way.
pub struct BatchRunner<K: ChainConnector> {
    connector: K,
    deployment: Deployment,
    plan: VotePlan,
    settings: RunnerSettings,
}

impl<K: ChainConnector> BatchRunner<K> {
    pub fn new(connector: K, deployment: Deployment, plan: VotePlan, settings: RunnerSettings) -> Self {
        Self {
            connector,
            deployment,
            plan,
            settings,
        }
    }

    pub async fn run(
        &self,
        accounts: &[Account],
        proxies: &[ProxyDescriptor],
        options: RunOptions,
    ) -> BatchSummary {
        info!("📋 Found {} accounts to process", accounts.len());
        info!("🌐 Found {} proxies to use", proxies.len());

        let mut summary = BatchSummary::default();

        for (index, account) in accounts.iter().enumerate() {
            info!("================================");
            info!("🔄 Processing account {}/{}", index + 1, accounts.len());

            let proxy = assign_proxy(proxies, index);
            match proxy {
                Some(proxy) => info!("🌐 Using proxy: {}", proxy),
                None => info!("🌐 Using proxy: No proxy"),
            }

            let report = self.process_account(account, proxy, options).await;
            summary.record(&report);

            if index + 1 < accounts.len() {
                info!(
                    "⏳ Waiting {:?} before processing next account...",
                    self.settings.inter_account_delay
                );
                sleep(self.settings.inter_account_delay).await;
            }
        }

        summary
    }

    async fn process_account(
        &self,
        account: &Account,
        proxy: Option<&ProxyDescriptor>,
        options: RunOptions,
    ) -> AccountReport {
        match self.connector.connect(account, proxy).await {
            Ok(chain) => {
                AccountRunner::new(&chain, &self.deployment, &self.plan, &self.settings)
                    .process(options)
                    .await
            }
            Err(e) => {
                error!("❌ Could not connect account {}: {}", account.address(), e);
                AccountReport {
                    address: account.address(),
                    claim: OperationOutcome::not_attempted(options.claim),
                    vote: OperationOutcome::not_attempted(options.vote),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_buckets() {
        let mut summary = BatchSummary::default();
        let address = alloy::primitives::Address::ZERO;
        summary.record(&AccountReport {
            address,
            claim: OperationOutcome::Succeeded,
            vote: OperationOutcome::Failed,
        });
        summary.record(&AccountReport {
            address,
            claim: OperationOutcome::Failed,
            vote: OperationOutcome::Skipped,
        });

        assert_eq!(summary.total, 2);
        assert_eq!(
            summary.claim,
            OperationTally {
                succeeded: 1,
                failed: 1,
                skipped: 0
            }
        );
        assert_eq!(summary.vote.failed, 1);
        assert_eq!(summary.vote.skipped, 1);
        assert!(summary.is_consistent());
    }

    #[test]
    fn test_summary_display() {
        let summary = BatchSummary {
            total: 3,
            claim: OperationTally {
                succeeded: 2,
                failed: 1,
                skipped: 0,
            },
            vote: OperationTally {
                succeeded: 0,
                failed: 0,
                skipped: 3,
            },
        };
        let text = summary.to_string();
        assert!(text.contains("Successful claims: 2/3"));
        assert!(text.contains("Failed claims: 1/3"));
        assert!(text.contains("Project voting was skipped"));
    }

    #[test]
    fn test_not_attempted_outcomes() {
        assert_eq!(OperationOutcome::not_attempted(true), OperationOutcome::Failed);
        assert_eq!(OperationOutcome::not_attempted(false), OperationOutcome::Skipped);
    }
}
