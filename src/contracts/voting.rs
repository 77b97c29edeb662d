use alloy::network::Ethereum;
use alloy::primitives::{Address, TxKind, B256, U256};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy::sol;
use alloy::sol_types::SolCall;
use anyhow::Result;
use std::sync::Arc;

sol! {
    #[sol(rpc)]
    interface IProjectVoting {
        function voteOnProjects(bytes32[] votingProjectIds, uint256[] votes) external;
    }
}

#[derive(Clone)]
pub struct VotingContract {
    address: Address,
    provider: Arc<dyn Provider<Ethereum>>,
}

impl VotingContract {
    pub fn new(address: Address, provider: Arc<dyn Provider<Ethereum>>) -> Self {
        Self { address, provider }
    }

    /// `project_ids` and `votes` are index-aligned.
    pub async fn vote_on_projects(
        &self,
        project_ids: &[B256],
        votes: &[U256],
        gas_limit: u64,
    ) -> Result<B256> {
        let call = IProjectVoting::voteOnProjectsCall {
            votingProjectIds: project_ids.to_vec(),
            votes: votes.to_vec(),
        };
        let data: Vec<u8> = call.abi_encode();

        let tx = TransactionRequest {
            to: Some(TxKind::Call(self.address)),
            input: TransactionInput::new(data.into()),
            gas: Some(gas_limit),
            ..Default::default()
        };

        let pending = self.provider.send_transaction(tx).await?;
        Ok(*pending.tx_hash())
    }
}
