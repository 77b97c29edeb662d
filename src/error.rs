use alloy::primitives::{Address, B256};
use alloy::sol_types::{Revert, SolError};
use alloy::transports::TransportError;
use thiserror::Error;

/// Failure of a single on-chain operation.
///
/// RPC failures are classified exactly once, in [`OperationError::from_rpc`],
/// at the boundary between the contract wrappers and the runner. Everything
/// downstream matches on the variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("no contract code deployed at {0}")]
    ContractNotDeployed(Address),

    #[error("insufficient allowance: {0}")]
    InsufficientAllowance(String),

    #[error("tokens already claimed: {0}")]
    AlreadyClaimed(String),

    #[error("claim time limit not elapsed: {0}")]
    TimeLimitNotElapsed(String),

    #[error("transaction {0} reverted")]
    TransactionReverted(B256),

    #[error("timed out waiting for transaction {0}")]
    ConfirmationTimeout(B256),

    #[error("{0}")]
    Unknown(String),
}

impl OperationError {
    /// Classifies an error returned by a contract wrapper or provider call.
    ///
    /// JSON-RPC error responses carrying `Error(string)` revert data are
    /// ABI-decoded first; anything else falls back to the error text.
    pub fn from_rpc(err: &anyhow::Error) -> Self {
        if let Some(reason) = err.downcast_ref::<TransportError>().and_then(revert_reason) {
            return Self::from_reason(&reason);
        }
        Self::from_reason(&format!("{:#}", err))
    }

    pub fn from_reason(reason: &str) -> Self {
        let lowered = reason.to_lowercase();
        if lowered.contains("allowance") {
            Self::InsufficientAllowance(reason.to_string())
        } else if lowered.contains("already claimed") {
            Self::AlreadyClaimed(reason.to_string())
        } else if lowered.contains("time limit") {
            Self::TimeLimitNotElapsed(reason.to_string())
        } else {
            Self::Unknown(reason.to_string())
        }
    }

    /// Faucet refusals that clear up on their own once the cooldown passes.
    pub fn is_claim_cooldown(&self) -> bool {
        matches!(self, Self::AlreadyClaimed(_) | Self::TimeLimitNotElapsed(_))
    }
}

fn revert_reason(err: &TransportError) -> Option<String> {
    let data = err.as_error_resp()?.as_revert_data()?;
    Revert::abi_decode(&data).ok().map(|revert| revert.reason)
}
