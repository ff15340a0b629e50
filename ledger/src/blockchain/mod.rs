mod block;
mod cancel;
mod chain;
pub mod hash_func;
mod scores;
mod snapshot;
mod transaction;

pub use block::{Block, CANCEL_CHECK_INTERVAL, GENESIS_PREVIOUS_DIGEST, MAX_DIFFICULTY};
pub use cancel::CancelToken;
pub use chain::{Ledger, GENESIS_PARTICIPANT};
pub use hash_func::{HashFunc, Sha256};
pub use scores::{ScoreBoard, NEGATIVE_PENALTY, POSITIVE_REWARD};
pub use snapshot::{BlockView, LedgerSnapshot};
pub use transaction::{SequenceGenerator, Submission, Transaction};
