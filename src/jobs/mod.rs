pub mod account_batch;

pub use account_batch::AccountBatchJob;
