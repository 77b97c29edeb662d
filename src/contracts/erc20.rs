use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes, TxKind, B256, U256};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy::sol;
use alloy::sol_types::SolCall;
use anyhow::Result;
use std::sync::Arc;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 value) external returns (bool);
    }
}

#[derive(Clone)]
pub struct ERC20Contract {
    address: Address,
    provider: Arc<dyn Provider<Ethereum>>,
}

impl ERC20Contract {
    pub fn new(address: Address, provider: Arc<dyn Provider<Ethereum>>) -> Self {
        Self { address, provider }
    }

    async fn read(&self, data: Vec<u8>) -> Result<Bytes> {
        let result = self
            .provider
            .call(TransactionRequest {
                to: Some(TxKind::Call(self.address)),
                input: TransactionInput::new(Bytes::from(data)),
                ..Default::default()
            })
            .await?;
        Ok(result)
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256> {
        let call = IERC20::balanceOfCall { account };
        let result = self.read(call.abi_encode()).await?;

        let decoded = IERC20::balanceOfCall::abi_decode_returns(&result)?;
        Ok(decoded)
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        let call = IERC20::allowanceCall { owner, spender };
        let result = self.read(call.abi_encode()).await?;

        let decoded = IERC20::allowanceCall::abi_decode_returns(&result)?;
        Ok(decoded)
    }

    pub async fn approve(&self, spender: Address, value: U256, gas_limit: u64) -> Result<B256> {
        let call = IERC20::approveCall { spender, value };
        let data: Vec<u8> = call.abi_encode();

        let tx = TransactionRequest {
            to: Some(TxKind::Call(self.address)),
            input: TransactionInput::new(data.into()),
            gas: Some(gas_limit),
            ..Default::default()
        };

        // Provider already has the account's wallet attached
        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        Ok(tx_hash)
    }
}
