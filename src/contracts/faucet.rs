use alloy::network::Ethereum;
use alloy::primitives::{Address, TxKind, B256};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy::sol;
use alloy::sol_types::SolCall;
use anyhow::Result;
use std::sync::Arc;

sol! {
    #[sol(rpc)]
    interface IFaucet {
        function claimTokens(address[] tokenAddresses) external;
    }
}

#[derive(Clone)]
pub struct FaucetContract {
    address: Address,
    provider: Arc<dyn Provider<Ethereum>>,
}

impl FaucetContract {
    pub fn new(address: Address, provider: Arc<dyn Provider<Ethereum>>) -> Self {
        Self { address, provider }
    }

    pub async fn claim_tokens(&self, tokens: &[Address], gas_limit: u64) -> Result<B256> {
        let call = IFaucet::claimTokensCall {
            tokenAddresses: tokens.to_vec(),
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
