use crate::accounts::Account;
use crate::proxy::ProxyDescriptor;
use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::signers::Signer;
use alloy::transports::http::Http;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Signing provider for one account, optionally routed through a proxy.
pub struct BlockchainClient {
    provider: Arc<dyn Provider<Ethereum>>,
    address: Address,
}

impl BlockchainClient {
    pub async fn new(
        rpc_url: &str,
        expected_chain_id: u64,
        account: &Account,
        proxy: Option<&ProxyDescriptor>,
    ) -> Result<Self> {
        let url = Url::parse(rpc_url)?;
        let signer = account.signer().clone().with_chain_id(Some(expected_chain_id));
        let address = signer.address();

        let provider: Arc<dyn Provider<Ethereum>> = match proxy {
            Some(proxy) => {
                info!("🔗 Connecting to RPC {} via proxy {}", rpc_url, proxy);
                let http_client = reqwest::Client::builder()
                    .proxy(proxy.to_reqwest_proxy()?)
                    .build()?;
                let client = RpcClient::new(Http::with_client(http_client, url), false);
                Arc::new(ProviderBuilder::new().wallet(signer).connect_client(client))
            }
            None => {
                info!("🔗 Connecting to RPC: {}", rpc_url);
                Arc::new(ProviderBuilder::new().wallet(signer).connect_http(url))
            }
        };

        let chain_id = provider.get_chain_id().await?;
        if chain_id != expected_chain_id {
            return Err(anyhow::anyhow!(
                "Chain ID mismatch: expected {}, got {}",
                expected_chain_id,
                chain_id
            ));
        }

        info!("✅ Connected to chain {} as {}", expected_chain_id, address);

        Ok(Self { provider, address })
    }

    pub fn provider(&self) -> Arc<dyn Provider<Ethereum>> {
        self.provider.clone()
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn get_code(&self, contract: Address) -> Result<Bytes> {
        Ok(self.provider.get_code_at(contract).await?)
    }

    pub async fn get_balance(&self, account: Address) -> Result<U256> {
        Ok(self.provider.get_balance(account).await?)
    }
}
