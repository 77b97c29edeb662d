pub mod erc20;
pub mod faucet;
pub mod voting;

pub use erc20::ERC20Contract;
pub use faucet::FaucetContract;
pub use voting::VotingContract;
