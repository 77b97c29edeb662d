use alloy::primitives::{address, b256, Address, B256, U256};

pub const RPC_URL: &str = "https://base-sepolia-rpc.publicnode.com";
pub const CHAIN_ID: u64 = 84532;
pub const EXPLORER_TX_URL: &str = "https://base-sepolia.blockscout.com/tx/";

pub const VOTING_CONTRACT_ADDRESS: Address = address!("672e69f8ED6eA070f5722d6c77940114cc901938");
pub const FAUCET_CONTRACT_ADDRESS: Address = address!("43808E0766f88332535FF8326F52e4734de35F0e");
pub const VOTING_TOKEN_ADDRESS: Address = address!("3E933b66904F83b6E91a9511877C99b43584adA3");

/// Tokens requested from the faucet on every claim. The last one is the voting token.
pub const FAUCET_TOKENS: [Address; 3] = [
    address!("Ea347A7CB535cBE125099A4C3B992149aE08e55d"),
    address!("B9e5D51908CCF86d91443e61a4C9d8e4FeE27e33"),
    VOTING_TOKEN_ADDRESS,
];

pub const PROJECT_IDS: [B256; 4] = [
    b256!("e5d033db611ae3f5682ace7285860a6ceb1195d5f80f2721a82d4baff67daddb"),
    b256!("b99bb4429ce45c2cf000bc98f847741c88603e234f6099d78fe47c2b50738776"),
    b256!("8689005e34728a5f6027d7c12bd49ef51fa54d62971bf6e5490fbaaaf85a1e21"),
    b256!("f712336c9a04915c7b25b30412d0fb8613a417cd8a94f00ca0b2da73e1704949"),
];

const ONE_TOKEN: u64 = 1_000_000_000_000_000_000;

/// 18-decimal token weights, same order as `PROJECT_IDS`.
pub const VOTE_WEIGHTS: [U256; 4] = [
    U256::from_limbs([4 * ONE_TOKEN, 0, 0, 0]),
    U256::from_limbs([2 * ONE_TOKEN, 0, 0, 0]),
    U256::from_limbs([2 * ONE_TOKEN, 0, 0, 0]),
    U256::from_limbs([2 * ONE_TOKEN, 0, 0, 0]),
];

pub const APPROVE_GAS_LIMIT: u64 = 100_000;
pub const CLAIM_GAS_LIMIT: u64 = 250_000;
pub const VOTE_GAS_LIMIT: u64 = 3_000_000;

/// Allowance granted when a vote bounces on an allowance error.
pub fn emergency_approval_amount() -> U256 {
    U256::from(1_000u64) * U256::from(ONE_TOKEN)
}

pub const DEFAULT_KEYS_FILE: &str = "pk.txt";
pub const DEFAULT_PROXIES_FILE: &str = "proxies.txt";
pub const DEFAULT_CONFIG_FILE: &str = "configs/bot.toml";

/// 0.001 ETH
pub const DEFAULT_MIN_GAS_BALANCE_WEI: &str = "1000000000000000";

pub fn explorer_tx_link(tx_hash: &B256) -> String {
    format!("{}{}", EXPLORER_TX_URL, tx_hash)
}
