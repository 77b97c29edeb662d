use alloy::network::Ethereum;
use alloy::primitives::B256;
use alloy::providers::Provider;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct TransactionReceipt {
    pub hash: B256,
    pub block_number: u64,
    pub gas_used: u64,
    pub status: TransactionStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransactionStatus {
    Success,
    Failed,
    Timeout,
}

impl TransactionReceipt {
    pub fn timed_out(hash: B256) -> Self {
        Self {
            hash,
            block_number: 0,
            gas_used: 0,
            status: TransactionStatus::Timeout,
        }
    }
}

/// Polls for a receipt until it lands or `max_wait_time` elapses.
pub struct TransactionMonitor {
    provider: Arc<dyn Provider<Ethereum>>,
    max_wait_time: Duration,
    poll_interval: Duration,
}

impl TransactionMonitor {
    pub fn new(provider: Arc<dyn Provider<Ethereum>>, max_wait_time: Duration, poll_interval: Duration) -> Self {
        Self {
            provider,
            max_wait_time,
            poll_interval,
        }
    }

    pub async fn monitor_transaction(&self, tx_hash: B256) -> Result<TransactionReceipt> {
        info!("🔍 Waiting for confirmation of {}", tx_hash);

        let start_time = std::time::Instant::now();

        loop {
            if start_time.elapsed() > self.max_wait_time {
                warn!("⏰ Transaction monitoring timeout after {:?}", self.max_wait_time);
                return Ok(TransactionReceipt::timed_out(tx_hash));
            }

            match self.provider.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    let status = if receipt.status() {
                        TransactionStatus::Success
                    } else {
                        TransactionStatus::Failed
                    };

                    info!("📦 Transaction {} mined (status: {:?})", tx_hash, status);

                    return Ok(TransactionReceipt {
                        hash: tx_hash,
                        block_number: receipt.block_number.unwrap_or(0),
                        gas_used: receipt.gas_used,
                        status,
                    });
                }
                Ok(None) => {
                    debug!("⏳ Transaction pending, waiting...");
                }
                Err(e) => {
                    warn!("❌ Error checking transaction status: {}", e);
                }
            }

            sleep(self.poll_interval).await;
        }
    }
}
