use std::fmt;

use log::{debug, warn};
use serde::Serialize;

use crate::error::{LedgerError, Result};

use super::{CancelToken, HashFunc, Transaction};

/// Previous digest recorded by the genesis block.
pub const GENESIS_PREVIOUS_DIGEST: &str = "0";

/// Nonce increments between two polls of the cancel token.
pub const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Digest width in hex characters; the largest meaningful difficulty.
pub const MAX_DIFFICULTY: u32 = 64;

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    index: u64,
    transaction: Transaction,
    previous_digest: String,
    nonce: u64,
    digest: String,
}

impl Block {
    pub fn new<THasher: HashFunc>(
        index: u64,
        transaction: Transaction,
        previous_digest: String,
        hasher: &THasher,
    ) -> Block {
        let mut block = Block {
            index,
            transaction,
            previous_digest,
            nonce: 0,
            digest: String::new(),
        };

        block.digest = block.compute_digest(hasher);
        block
    }

    pub(crate) fn genesis<THasher: HashFunc>(transaction: Transaction, hasher: &THasher) -> Block {
        Block::new(0, transaction, GENESIS_PREVIOUS_DIGEST.to_string(), hasher)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn previous_digest(&self) -> &str {
        &self.previous_digest
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    fn compute_digest<THasher: HashFunc>(&self, hasher: &THasher) -> String {
        let input = format!(
            "{}{}{}{}",
            self.index,
            self.transaction.canonical_string(),
            self.previous_digest,
            self.nonce
        );

        hex::encode(hasher.hash(input.as_bytes()))
    }

    /// Searches nonces upward from the current one until the digest starts
    /// with `difficulty` zero hex characters.
    ///
    /// On cancellation the block is left with a consistent but unmined
    /// (nonce, digest) pair and `LedgerError::Aborted` is returned.
    pub fn mine<THasher: HashFunc>(
        &mut self,
        difficulty: u32,
        hasher: &THasher,
        cancel: &CancelToken,
    ) -> Result<()> {
        let mut attempts: u64 = 0;

        while !self.meets_difficulty(difficulty) {
            if attempts % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                warn!(
                    "[⛏️] Mining of block {} cancelled at nonce {}",
                    self.index, self.nonce
                );
                return Err(LedgerError::Aborted {
                    index: self.index,
                    nonce: self.nonce,
                });
            }

            self.nonce = self.nonce.wrapping_add(1);
            self.digest = self.compute_digest(hasher);
            attempts = attempts.wrapping_add(1);
        }

        debug!(
            "[⛏️] Block {} solved after {} attempts (nonce {})",
            self.index, attempts, self.nonce
        );
        Ok(())
    }

    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        let nibbles = difficulty as usize;

        if nibbles > self.digest.len() {
            return false;
        }

        self.digest.bytes().take(nibbles).all(|c| c == b'0')
    }

    /// Recomputes the digest and compares it to the stored one.
    pub fn validate<THasher: HashFunc>(&self, hasher: &THasher) -> bool {
        self.compute_digest(hasher) == self.digest
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block")
            .field("index", &self.index)
            .field("transaction", &self.transaction.canonical_string())
            .field("previous_digest", &self.previous_digest)
            .field("nonce", &self.nonce)
            .field("digest", &self.digest)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{hash_func, SequenceGenerator, Sha256};

    fn block(sequence: &SequenceGenerator) -> Block {
        let tx = Transaction::new(sequence, "alice".into(), "bob".into(), 10);
        Block::new(1, tx, GENESIS_PREVIOUS_DIGEST.into(), &Sha256)
    }

    #[test]
    fn test_new_block_digest_covers_all_fields() {
        let sequence = SequenceGenerator::new();
        let block = block(&sequence);

        assert_eq!(block.nonce(), 0);
        assert_eq!(block.digest(), hash_func::digest_hex(b"1alice:bob:10:000"));
        assert!(block.validate(&Sha256));
    }

    #[test]
    fn test_mine_reaches_difficulty() {
        let sequence = SequenceGenerator::new();

        for difficulty in 0..=3 {
            let mut block = block(&sequence);
            block
                .mine(difficulty, &Sha256, &CancelToken::never())
                .unwrap();

            assert!(block.digest().starts_with(&"0".repeat(difficulty as usize)));
            assert!(block.validate(&Sha256));
        }
    }

    #[test]
    fn test_mine_is_deterministic() {
        let mut first = block(&SequenceGenerator::new());
        let mut second = block(&SequenceGenerator::new());

        first.mine(2, &Sha256, &CancelToken::never()).unwrap();
        second.mine(2, &Sha256, &CancelToken::never()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_mine_difficulty_zero_keeps_nonce() {
        let mut block = block(&SequenceGenerator::new());
        let digest = block.digest().to_string();

        block.mine(0, &Sha256, &CancelToken::never()).unwrap();

        assert_eq!(block.nonce(), 0);
        assert_eq!(block.digest(), digest);
    }

    #[test]
    fn test_mine_cancelled() {
        let mut block = block(&SequenceGenerator::new());
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = block.mine(MAX_DIFFICULTY, &Sha256, &cancel);

        assert!(matches!(result, Err(LedgerError::Aborted { index: 1, .. })));
        assert!(block.validate(&Sha256));
    }

    #[test]
    fn test_difficulty_beyond_digest_width_is_never_met() {
        let block = block(&SequenceGenerator::new());
        assert!(!block.meets_difficulty(MAX_DIFFICULTY + 1));
    }

    #[test]
    fn test_tampered_nonce_fails_validation() {
        let mut block = block(&SequenceGenerator::new());
        block.nonce += 1;

        assert!(!block.validate(&Sha256));
    }
}
