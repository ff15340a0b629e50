pub mod blockchain;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;

pub use blockchain::{CancelToken, Ledger, LedgerSnapshot, Submission};
pub use config::Config;
pub use error::{LedgerError, Result};
