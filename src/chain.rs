use crate::accounts::Account;
use crate::blockchain::BlockchainClient;
use crate::constants::{
    APPROVE_GAS_LIMIT, CHAIN_ID, CLAIM_GAS_LIMIT, FAUCET_CONTRACT_ADDRESS, FAUCET_TOKENS, RPC_URL,
    VOTE_GAS_LIMIT, VOTING_CONTRACT_ADDRESS, VOTING_TOKEN_ADDRESS,
};
use crate::contracts::{ERC20Contract, FaucetContract, VotingContract};
use crate::error::OperationError;
use crate::proxy::ProxyDescriptor;
use crate::retry::{execute_with_retry, RetryConfig};
use crate::transaction_monitor::{TransactionMonitor, TransactionReceipt};
use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasLimits {
    pub approve: u64,
    pub claim: u64,
    pub vote: u64,
}

impl Default for GasLimits {
    fn default() -> Self {
        Self {
            approve: APPROVE_GAS_LIMIT,
            claim: CLAIM_GAS_LIMIT,
            vote: VOTE_GAS_LIMIT,
        }
    }
}

/// Contracts the runner talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub faucet: Address,
    pub voting: Address,
    pub voting_token: Address,
    pub faucet_tokens: Vec<Address>,
    pub gas: GasLimits,
}

impl Default for Deployment {
    fn default() -> Self {
        Self {
            faucet: FAUCET_CONTRACT_ADDRESS,
            voting: VOTING_CONTRACT_ADDRESS,
            voting_token: VOTING_TOKEN_ADDRESS,
            faucet_tokens: FAUCET_TOKENS.to_vec(),
            gas: GasLimits::default(),
        }
    }
}

/// Everything the runner needs from the chain, scoped to one account.
#[async_trait]
pub trait ChainOps: Send + Sync {
    fn address(&self) -> Address;

    async fn code_at(&self, contract: Address) -> Result<Bytes, OperationError>;

    async fn native_balance(&self) -> Result<U256, OperationError>;

    async fn token_balance(&self, token: Address) -> Result<U256, OperationError>;

    async fn allowance(&self, token: Address, spender: Address) -> Result<U256, OperationError>;

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        gas_limit: u64,
    ) -> Result<B256, OperationError>;

    async fn claim_tokens(
        &self,
        faucet: Address,
        tokens: &[Address],
        gas_limit: u64,
    ) -> Result<B256, OperationError>;

    async fn vote_on_projects(
        &self,
        voting: Address,
        project_ids: &[B256],
        weights: &[U256],
        gas_limit: u64,
    ) -> Result<B256, OperationError>;

    async fn wait_for_confirmation(&self, tx_hash: B256) -> Result<TransactionReceipt, OperationError>;
}

/// Opens a fresh per-account chain session.
#[async_trait]
pub trait ChainConnector: Send + Sync {
    type Chain: ChainOps;

    async fn connect(
        &self,
        account: &Account,
        proxy: Option<&ProxyDescriptor>,
    ) -> Result<Self::Chain, OperationError>;
}

fn rpc_err(err: anyhow::Error) -> OperationError {
    OperationError::from_rpc(&err)
}

pub struct LiveChain {
    client: BlockchainClient,
    monitor: TransactionMonitor,
}

impl LiveChain {
    pub fn new(client: BlockchainClient, max_wait_time: Duration, poll_interval: Duration) -> Self {
        let monitor = TransactionMonitor::new(client.provider(), max_wait_time, poll_interval);
        Self { client, monitor }
    }

    fn erc20(&self, token: Address) -> ERC20Contract {
        ERC20Contract::new(token, self.client.provider())
    }
}

#[async_trait]
impl ChainOps for LiveChain {
    fn address(&self) -> Address {
        self.client.address()
    }

    async fn code_at(&self, contract: Address) -> Result<Bytes, OperationError> {
        self.client.get_code(contract).await.map_err(rpc_err)
    }

    async fn native_balance(&self) -> Result<U256, OperationError> {
        self.client.get_balance(self.client.address()).await.map_err(rpc_err)
    }

    async fn token_balance(&self, token: Address) -> Result<U256, OperationError> {
        self.erc20(token)
            .balance_of(self.client.address())
            .await
            .map_err(rpc_err)
    }

    async fn allowance(&self, token: Address, spender: Address) -> Result<U256, OperationError> {
        self.erc20(token)
            .allowance(self.client.address(), spender)
            .await
            .map_err(rpc_err)
    }

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        gas_limit: u64,
    ) -> Result<B256, OperationError> {
        self.erc20(token)
            .approve(spender, amount, gas_limit)
            .await
            .map_err(rpc_err)
    }

    async fn claim_tokens(
        &self,
        faucet: Address,
        tokens: &[Address],
        gas_limit: u64,
    ) -> Result<B256, OperationError> {
        FaucetContract::new(faucet, self.client.provider())
            .claim_tokens(tokens, gas_limit)
            .await
            .map_err(rpc_err)
    }

    async fn vote_on_projects(
        &self,
        voting: Address,
        project_ids: &[B256],
        weights: &[U256],
        gas_limit: u64,
    ) -> Result<B256, OperationError> {
        VotingContract::new(voting, self.client.provider())
            .vote_on_projects(project_ids, weights, gas_limit)
            .await
            .map_err(rpc_err)
    }

    async fn wait_for_confirmation(&self, tx_hash: B256) -> Result<TransactionReceipt, OperationError> {
        self.monitor.monitor_transaction(tx_hash).await.map_err(rpc_err)
    }
}

/// Connects to the fixed RPC endpoint, retrying the handshake.
pub struct LiveConnector {
    pub rpc_url: String,
    pub chain_id: u64,
    pub retry: RetryConfig,
    pub transaction_timeout: Duration,
    pub poll_interval: Duration,
}

impl LiveConnector {
    pub fn new(retry: RetryConfig, transaction_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            rpc_url: RPC_URL.to_string(),
            chain_id: CHAIN_ID,
            retry,
            transaction_timeout,
            poll_interval,
        }
    }
}

#[async_trait]
impl ChainConnector for LiveConnector {
    type Chain = LiveChain;

    async fn connect(
        &self,
        account: &Account,
        proxy: Option<&ProxyDescriptor>,
    ) -> Result<LiveChain, OperationError> {
        let client = execute_with_retry(
            || BlockchainClient::new(&self.rpc_url, self.chain_id, account, proxy),
            &self.retry,
            "Blockchain connection",
        )
        .await
        .map_err(|e| OperationError::Unknown(format!("{:#}", e)))?;

        Ok(LiveChain::new(client, self.transaction_timeout, self.poll_interval))
    }
}
