use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("sender {sender} is banned: score {score} is below threshold {threshold}")]
    PolicyViolation {
        sender: String,
        score: i64,
        threshold: i64,
    },

    #[error("mining of block {index} aborted at nonce {nonce}")]
    Aborted { index: u64, nonce: u64 },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("integrity violation at block {index}: {reason}")]
    IntegrityViolation { index: u64, reason: String },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
