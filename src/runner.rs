//! Per-account operation sequencing.
//!
//! One [`AccountRunner`] drives a single account through its guards, the
//! faucet claim and the weighted vote. Operation errors never escape: each
//! operation ends as an [`OperationOutcome`].

use crate::chain::{ChainOps, Deployment};
use crate::config::BotConfig;
use crate::constants::{emergency_approval_amount, explorer_tx_link};
use crate::error::OperationError;
use crate::retry::{execute_with_retry, RetryConfig};
use crate::transaction_monitor::TransactionStatus;
use crate::vote_plan::VotePlan;
use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, B256, U256};
use anyhow::Result;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub claim: bool,
    pub vote: bool,
    pub check_balances: bool,
}

impl RunOptions {
    pub fn claim_only() -> Self {
        Self {
            claim: true,
            ..Self::default()
        }
    }

    pub fn vote_only() -> Self {
        Self {
            vote: true,
            ..Self::default()
        }
    }

    pub fn claim_and_vote() -> Self {
        Self {
            claim: true,
            vote: true,
            check_balances: false,
        }
    }

    pub fn balances_only() -> Self {
        Self {
            check_balances: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.claim && !self.vote && !self.check_balances
    }

    pub fn submits_transactions(&self) -> bool {
        self.claim || self.vote
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    Succeeded,
    Failed,
    Skipped,
}

impl OperationOutcome {
    fn from_success(success: bool) -> Self {
        if success {
            OperationOutcome::Succeeded
        } else {
            OperationOutcome::Failed
        }
    }

    /// Outcome for an enabled operation that never got to run.
    pub fn not_attempted(enabled: bool) -> Self {
        if enabled {
            OperationOutcome::Failed
        } else {
            OperationOutcome::Skipped
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountReport {
    pub address: Address,
    pub claim: OperationOutcome,
    pub vote: OperationOutcome,
}

/// Timing and threshold knobs for the runner and batch driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerSettings {
    pub retry: RetryConfig,
    pub claim_to_vote_delay: Duration,
    pub inter_account_delay: Duration,
    pub min_gas_balance: U256,
}

impl RunnerSettings {
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        Ok(Self {
            retry: config.retry_config(),
            claim_to_vote_delay: Duration::from_secs(config.timing.claim_to_vote_delay_seconds),
            inter_account_delay: Duration::from_secs(config.timing.inter_account_delay_seconds),
            min_gas_balance: config.min_gas_balance()?,
        })
    }
}

pub struct AccountRunner<'a, C: ChainOps> {
    chain: &'a C,
    deployment: &'a Deployment,
    plan: &'a VotePlan,
    settings: &'a RunnerSettings,
}

impl<'a, C: ChainOps> AccountRunner<'a, C> {
    pub fn new(
        chain: &'a C,
        deployment: &'a Deployment,
        plan: &'a VotePlan,
        settings: &'a RunnerSettings,
    ) -> Self {
        Self {
            chain,
            deployment,
            plan,
            settings,
        }
    }

    pub async fn process(&self, options: RunOptions) -> AccountReport {
        info!("👛 Wallet address: {}", self.chain.address());
        self.check_gas_balance().await;

        if options.check_balances {
            self.report_token_balances().await;
        }

        let mut claim = OperationOutcome::Skipped;
        let mut vote = OperationOutcome::Skipped;

        if options.claim {
            claim = OperationOutcome::from_success(self.claim_with_retry().await);
            if options.vote {
                info!("⏳ Waiting {:?} before voting...", self.settings.claim_to_vote_delay);
                sleep(self.settings.claim_to_vote_delay).await;
            }
        }

        if options.vote {
            vote = OperationOutcome::from_success(self.vote_with_retry().await);
        }

        if options.submits_transactions() {
            info!("📊 Checking updated token balances");
            self.report_token_balances().await;
        }

        AccountReport {
            address: self.chain.address(),
            claim,
            vote,
        }
    }

    pub async fn claim_with_retry(&self) -> bool {
        execute_with_retry(|| self.claim(), &self.settings.retry, "Claim")
            .await
            .is_ok()
    }

    pub async fn vote_with_retry(&self) -> bool {
        execute_with_retry(|| self.vote(), &self.settings.retry, "Vote")
            .await
            .is_ok()
    }

    /// Advisory only: a low or unreadable balance is logged, never fatal.
    pub async fn check_gas_balance(&self) -> Option<U256> {
        match self.chain.native_balance().await {
            Ok(balance) => {
                info!("💰 Current ETH balance: {} ETH", format_ether(balance));
                if balance < self.settings.min_gas_balance {
                    warn!("⚠️ ETH balance may be too low for gas fees");
                }
                Some(balance)
            }
            Err(e) => {
                warn!("⚠️ Could not read ETH balance: {}", e);
                None
            }
        }
    }

    pub async fn report_token_balances(&self) {
        for token in &self.deployment.faucet_tokens {
            match self.chain.token_balance(*token).await {
                Ok(balance) => info!("🪙 {}: {} tokens", token, format_ether(balance)),
                Err(e) => warn!("⚠️ Error checking balance for token {}: {}", token, e),
            }
        }
    }

    /// Empty bytecode is fatal for the operation that needs the contract.
    pub async fn ensure_deployed(&self, contract: Address) -> Result<(), OperationError> {
        let code = self.chain.code_at(contract).await?;
        if code.is_empty() {
            error!("❌ No contract deployed at {}", contract);
            return Err(OperationError::ContractNotDeployed(contract));
        }
        Ok(())
    }

    async fn confirm(&self, tx_hash: B256, label: &str) -> Result<(), OperationError> {
        info!("📤 {} transaction submitted: {}", label, tx_hash);
        info!("🔗 View transaction: {}", explorer_tx_link(&tx_hash));

        let receipt = self.chain.wait_for_confirmation(tx_hash).await?;
        match receipt.status {
            TransactionStatus::Success => {
                info!(
                    "🎉 {} transaction confirmed in block {} (gas used: {})",
                    label, receipt.block_number, receipt.gas_used
                );
                Ok(())
            }
            TransactionStatus::Failed => {
                error!("❌ {} transaction {} reverted", label, tx_hash);
                Err(OperationError::TransactionReverted(tx_hash))
            }
            TransactionStatus::Timeout => {
                error!("⏰ {} transaction {} not confirmed in time", label, tx_hash);
                Err(OperationError::ConfirmationTimeout(tx_hash))
            }
        }
    }

    pub async fn claim(&self) -> Result<(), OperationError> {
        let result = self.try_claim().await;
        if let Err(e) = &result {
            error!("❌ Error claiming tokens: {}", e);
            if e.is_claim_cooldown() {
                info!("⏸️ Tokens were claimed recently; the faucet enforces a time limit between claims");
            }
        }
        result
    }

    async fn try_claim(&self) -> Result<(), OperationError> {
        info!("🚰 Claiming tokens for {}", self.chain.address());
        for token in &self.deployment.faucet_tokens {
            info!("   - {}", token);
        }

        self.ensure_deployed(self.deployment.faucet).await?;

        let gas_limit = self.deployment.gas.claim;
        info!("⛽ Using fixed gas limit for claiming: {}", gas_limit);
        let tx_hash = self
            .chain
            .claim_tokens(self.deployment.faucet, &self.deployment.faucet_tokens, gas_limit)
            .await?;
        self.confirm(tx_hash, "Claim").await
    }

    /// Approves `2 x required` unless the current allowance already covers the plan.
    pub async fn ensure_allowance(&self) -> Result<(), OperationError> {
        let token = self.deployment.voting_token;
        let spender = self.deployment.voting;

        let current = self.chain.allowance(token, spender).await?;
        info!("🔐 Current allowance: {} tokens", format_ether(current));

        if !self.plan.needs_approval(current) {
            info!("✅ Sufficient allowance already exists, skipping approval");
            return Ok(());
        }

        let amount = self.plan.approval_amount();
        info!(
            "📝 Approving {} tokens for the voting contract (requires {})",
            format_ether(amount),
            format_ether(self.plan.required_allowance())
        );
        let tx_hash = self
            .chain
            .approve(token, spender, amount, self.deployment.gas.approve)
            .await?;
        self.confirm(tx_hash, "Approval").await?;

        match self.chain.allowance(token, spender).await {
            Ok(updated) => info!("🔐 New allowance: {} tokens", format_ether(updated)),
            Err(e) => warn!("⚠️ Could not re-read allowance: {}", e),
        }
        Ok(())
    }

    pub async fn vote(&self) -> Result<(), OperationError> {
        let result = self.try_vote().await;
        if let Err(e) = &result {
            error!("❌ Error voting on projects: {}", e);
        }
        result
    }

    async fn try_vote(&self) -> Result<(), OperationError> {
        info!("🗳️ Voting on projects from {}", self.chain.address());
        for (i, (project, weight)) in self.plan.entries().enumerate() {
            info!("   Project {}: {} - {} tokens", i + 1, project, format_ether(*weight));
        }

        self.ensure_deployed(self.deployment.voting).await?;

        if let Err(e) = self.ensure_allowance().await {
            error!("❌ Failed to approve tokens for voting, aborting vote");
            return Err(e);
        }

        let gas_limit = self.deployment.gas.vote;
        info!("⛽ Using fixed gas limit for voting: {}", gas_limit);
        let tx_hash = match self
            .chain
            .vote_on_projects(
                self.deployment.voting,
                self.plan.project_ids(),
                self.plan.weights(),
                gas_limit,
            )
            .await
        {
            Ok(tx_hash) => tx_hash,
            Err(e) => {
                // Only a rejected vote submission warrants the large approval
                if matches!(e, OperationError::InsufficientAllowance(_)) {
                    self.emergency_approve().await;
                }
                return Err(e);
            }
        };
        self.confirm(tx_hash, "Vote").await
    }

    /// One-shot large approval after a vote bounced on allowance. The vote
    /// itself still counts as failed; the retry loop decides what happens next.
    async fn emergency_approve(&self) {
        let amount = emergency_approval_amount();
        warn!(
            "🚨 Allowance error, submitting emergency approval of {} tokens",
            format_ether(amount)
        );

        let result = match self
            .chain
            .approve(
                self.deployment.voting_token,
                self.deployment.voting,
                amount,
                self.deployment.gas.approve,
            )
            .await
        {
            Ok(tx_hash) => self.confirm(tx_hash, "Emergency approval").await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => info!("✅ Emergency approval successful"),
            Err(e) => error!("❌ Emergency approval failed: {}", e),
        }
    }
}
