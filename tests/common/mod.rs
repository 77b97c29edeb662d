//! In-memory chain used by the runner and batch tests.

#![allow(dead_code)]

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use opensci_bot::{
    Account, ChainConnector, ChainOps, Deployment, OperationError, ProxyDescriptor, RetryConfig,
    RunnerSettings, TransactionReceipt, TransactionStatus,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
        gas_limit: u64,
    },
    Claim {
        faucet: Address,
        tokens: Vec<Address>,
        gas_limit: u64,
    },
    Vote {
        voting: Address,
        project_ids: Vec<B256>,
        weights: Vec<U256>,
        gas_limit: u64,
    },
}

#[derive(Debug, Clone)]
pub struct MockState {
    pub deployed: HashSet<Address>,
    pub native_balance: U256,
    pub allowance: U256,
    pub native_balance_error: Option<OperationError>,
    pub token_balance_error: Option<OperationError>,
    pub native_balance_reads: u32,
    pub token_balance_reads: u32,
    pub approve_errors: VecDeque<OperationError>,
    pub claim_errors: VecDeque<OperationError>,
    pub vote_errors: VecDeque<OperationError>,
    pub approve_receipts: VecDeque<TransactionStatus>,
    pub claim_receipts: VecDeque<TransactionStatus>,
    pub vote_receipts: VecDeque<TransactionStatus>,
    pub claim_attempts: u32,
    pub vote_attempts: u32,
    pub submissions: Vec<Submission>,
    statuses: HashMap<B256, TransactionStatus>,
    pending_approvals: HashMap<B256, U256>,
}

impl MockState {
    /// Both contracts deployed, plenty of gas, no allowance.
    pub fn healthy(deployment: &Deployment) -> Self {
        Self {
            deployed: [deployment.faucet, deployment.voting].into_iter().collect(),
            native_balance: U256::from(10u64).pow(U256::from(18u64)),
            allowance: U256::ZERO,
            native_balance_error: None,
            token_balance_error: None,
            native_balance_reads: 0,
            token_balance_reads: 0,
            approve_errors: VecDeque::new(),
            claim_errors: VecDeque::new(),
            vote_errors: VecDeque::new(),
            approve_receipts: VecDeque::new(),
            claim_receipts: VecDeque::new(),
            vote_receipts: VecDeque::new(),
            claim_attempts: 0,
            vote_attempts: 0,
            submissions: Vec::new(),
            statuses: HashMap::new(),
            pending_approvals: HashMap::new(),
        }
    }

    fn next_hash(&self) -> B256 {
        B256::left_padding_from(&(self.submissions.len() as u64 + 1).to_be_bytes())
    }

    fn submit(&mut self, submission: Submission, status: Option<TransactionStatus>) -> B256 {
        let hash = self.next_hash();
        self.statuses
            .insert(hash, status.unwrap_or(TransactionStatus::Success));
        if let Submission::Approve { amount, .. } = &submission {
            self.pending_approvals.insert(hash, *amount);
        }
        self.submissions.push(submission);
        hash
    }

    pub fn claims(&self) -> usize {
        self.submissions
            .iter()
            .filter(|s| matches!(s, Submission::Claim { .. }))
            .count()
    }

    pub fn votes(&self) -> usize {
        self.submissions
            .iter()
            .filter(|s| matches!(s, Submission::Vote { .. }))
            .count()
    }

    pub fn approvals(&self) -> Vec<U256> {
        self.submissions
            .iter()
            .filter_map(|s| match s {
                Submission::Approve { amount, .. } => Some(*amount),
                _ => None,
            })
            .collect()
    }
}

pub struct MockChain {
    pub address: Address,
    pub state: Arc<Mutex<MockState>>,
}

impl MockChain {
    pub fn new(state: MockState) -> Self {
        Self {
            address: Address::repeat_byte(0xAA),
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn snapshot(&self) -> MockState {
        self.state.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainOps for MockChain {
    fn address(&self) -> Address {
        self.address
    }

    async fn code_at(&self, contract: Address) -> Result<Bytes, OperationError> {
        let state = self.state.lock().unwrap();
        if state.deployed.contains(&contract) {
            Ok(Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]))
        } else {
            Ok(Bytes::new())
        }
    }

    async fn native_balance(&self) -> Result<U256, OperationError> {
        let mut state = self.state.lock().unwrap();
        state.native_balance_reads += 1;
        match &state.native_balance_error {
            Some(err) => Err(err.clone()),
            None => Ok(state.native_balance),
        }
    }

    async fn token_balance(&self, _token: Address) -> Result<U256, OperationError> {
        let mut state = self.state.lock().unwrap();
        state.token_balance_reads += 1;
        match &state.token_balance_error {
            Some(err) => Err(err.clone()),
            None => Ok(U256::ZERO),
        }
    }

    async fn allowance(&self, _token: Address, _spender: Address) -> Result<U256, OperationError> {
        Ok(self.state.lock().unwrap().allowance)
    }

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        gas_limit: u64,
    ) -> Result<B256, OperationError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.approve_errors.pop_front() {
            return Err(err);
        }
        let status = state.approve_receipts.pop_front();
        Ok(state.submit(
            Submission::Approve {
                token,
                spender,
                amount,
                gas_limit,
            },
            status,
        ))
    }

    async fn claim_tokens(
        &self,
        faucet: Address,
        tokens: &[Address],
        gas_limit: u64,
    ) -> Result<B256, OperationError> {
        let mut state = self.state.lock().unwrap();
        state.claim_attempts += 1;
        if let Some(err) = state.claim_errors.pop_front() {
            return Err(err);
        }
        let status = state.claim_receipts.pop_front();
        Ok(state.submit(
            Submission::Claim {
                faucet,
                tokens: tokens.to_vec(),
                gas_limit,
            },
            status,
        ))
    }

    async fn vote_on_projects(
        &self,
        voting: Address,
        project_ids: &[B256],
        weights: &[U256],
        gas_limit: u64,
    ) -> Result<B256, OperationError> {
        let mut state = self.state.lock().unwrap();
        state.vote_attempts += 1;
        if let Some(err) = state.vote_errors.pop_front() {
            return Err(err);
        }
        let status = state.vote_receipts.pop_front();
        Ok(state.submit(
            Submission::Vote {
                voting,
                project_ids: project_ids.to_vec(),
                weights: weights.to_vec(),
                gas_limit,
            },
            status,
        ))
    }

    async fn wait_for_confirmation(&self, tx_hash: B256) -> Result<TransactionReceipt, OperationError> {
        let mut state = self.state.lock().unwrap();
        let status = state
            .statuses
            .get(&tx_hash)
            .cloned()
            .unwrap_or(TransactionStatus::Success);
        if status == TransactionStatus::Success {
            if let Some(amount) = state.pending_approvals.remove(&tx_hash) {
                state.allowance = amount;
            }
        }
        Ok(TransactionReceipt {
            hash: tx_hash,
            block_number: 1,
            gas_used: 21_000,
            status,
        })
    }
}

/// Hands every account a fresh copy of its configured state and records
/// which proxy each connection used.
pub struct MockConnector {
    pub template: MockState,
    pub overrides: HashMap<Address, MockState>,
    pub unreachable: HashSet<Address>,
    pub connections: Arc<Mutex<Vec<(Address, Option<String>)>>>,
    pub sessions: Arc<Mutex<Vec<Arc<Mutex<MockState>>>>>,
}

impl MockConnector {
    pub fn new(template: MockState) -> Self {
        Self {
            template,
            overrides: HashMap::new(),
            unreachable: HashSet::new(),
            connections: Arc::new(Mutex::new(Vec::new())),
            sessions: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ChainConnector for MockConnector {
    type Chain = MockChain;

    async fn connect(
        &self,
        account: &Account,
        proxy: Option<&ProxyDescriptor>,
    ) -> Result<MockChain, OperationError> {
        self.connections
            .lock()
            .unwrap()
            .push((account.address(), proxy.map(|p| p.host.clone())));

        if self.unreachable.contains(&account.address()) {
            return Err(OperationError::Unknown("connection refused".to_string()));
        }

        let state = self
            .overrides
            .get(&account.address())
            .cloned()
            .unwrap_or_else(|| self.template.clone());
        let chain = MockChain {
            address: account.address(),
            state: Arc::new(Mutex::new(state)),
        };
        self.sessions.lock().unwrap().push(chain.state.clone());
        Ok(chain)
    }
}

pub fn fast_settings() -> RunnerSettings {
    RunnerSettings {
        retry: RetryConfig::new(3, Duration::ZERO),
        claim_to_vote_delay: Duration::ZERO,
        inter_account_delay: Duration::ZERO,
        min_gas_balance: U256::from(1_000_000_000_000_000u64),
    }
}

pub fn random_accounts(n: usize) -> Vec<Account> {
    (0..n)
        .map(|_| Account::from_signer(PrivateKeySigner::random()))
        .collect()
}

pub fn token(n: u64) -> U256 {
    U256::from(n) * U256::from(1_000_000_000_000_000_000u64)
}
