pub mod accounts;
pub mod batch;
pub mod blockchain;
pub mod chain;
pub mod config;
pub mod constants;
pub mod contracts;
pub mod error;
pub mod jobs;
pub mod menu;
pub mod proxy;
pub mod retry;
pub mod runner;
pub mod scheduler;
pub mod transaction_monitor;
pub mod vote_plan;

pub use accounts::Account;
pub use batch::{BatchRunner, BatchSummary, OperationTally};
pub use blockchain::BlockchainClient;
pub use chain::{ChainConnector, ChainOps, Deployment, GasLimits, LiveChain, LiveConnector};
pub use config::BotConfig;
pub use error::OperationError;
pub use jobs::AccountBatchJob;
pub use proxy::ProxyDescriptor;
pub use retry::{execute_with_retry, RetryConfig};
pub use runner::{AccountReport, AccountRunner, OperationOutcome, RunOptions, RunnerSettings};
pub use scheduler::DailyScheduler;
pub use transaction_monitor::{TransactionMonitor, TransactionReceipt, TransactionStatus};
pub use vote_plan::VotePlan;
