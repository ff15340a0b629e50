use std::collections::BTreeMap;

use log::{info, warn};

use crate::{
    config::Config,
    error::{LedgerError, Result},
};

use super::{
    block::GENESIS_PREVIOUS_DIGEST, Block, BlockView, CancelToken, HashFunc, LedgerSnapshot,
    ScoreBoard, SequenceGenerator, Sha256, Submission, Transaction,
};

/// Sender and receiver of the genesis transaction.
pub const GENESIS_PARTICIPANT: &str = "System";

/// Append-only chain of mined blocks, one transaction per block.
///
/// Mutation goes through `append_transaction` only and needs `&mut self`;
/// callers that share a ledger across threads serialize writers with a
/// lock. Readers only ever see fully mined, linked blocks.
#[derive(Debug)]
pub struct Ledger<THasher: HashFunc = Sha256> {
    difficulty: u32,
    ban_threshold: i64,
    blocks: Vec<Block>,
    sequence: SequenceGenerator,
    score_cache: ScoreBoard,
    hasher: THasher,
}

impl Ledger<Sha256> {
    pub fn new(difficulty: u32, ban_threshold: i64) -> Ledger<Sha256> {
        Ledger::with_hasher(difficulty, ban_threshold, Sha256)
    }

    pub fn from_config(config: &Config) -> Ledger<Sha256> {
        Ledger::new(config.difficulty, config.ban_threshold)
    }
}

impl<THasher: HashFunc> Ledger<THasher> {
    pub fn with_hasher(difficulty: u32, ban_threshold: i64, hasher: THasher) -> Ledger<THasher> {
        let sequence = SequenceGenerator::new();
        let genesis = Block::genesis(
            Transaction::new(
                &sequence,
                GENESIS_PARTICIPANT.to_string(),
                GENESIS_PARTICIPANT.to_string(),
                0,
            ),
            &hasher,
        );

        Ledger {
            difficulty,
            ban_threshold,
            blocks: vec![genesis],
            sequence,
            score_cache: ScoreBoard::new(),
            hasher,
        }
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn ban_threshold(&self) -> i64 {
        self.ban_threshold
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: the genesis block is present from construction.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn latest(&self) -> &Block {
        self.blocks
            .last()
            .expect("ledger always holds the genesis block")
    }

    /// Mines a block for the transfer and appends it.
    ///
    /// The ledger is untouched unless the call returns `Ok`: the block is
    /// mined off to the side and pushed only once it satisfies the
    /// difficulty.
    pub fn append_transaction(
        &mut self,
        sender: &str,
        receiver: &str,
        amount: i64,
        cancel: &CancelToken,
    ) -> Result<&Block> {
        if sender.trim().is_empty() {
            return Err(LedgerError::MalformedInput("missing sender".into()));
        }
        if receiver.trim().is_empty() {
            return Err(LedgerError::MalformedInput("missing receiver".into()));
        }

        let score = self.score_cache.score(sender);
        if score < self.ban_threshold {
            warn!(
                "[🚫] Rejected transaction from {}: score {} below {}",
                sender, score, self.ban_threshold
            );
            return Err(LedgerError::PolicyViolation {
                sender: sender.to_string(),
                score,
                threshold: self.ban_threshold,
            });
        }

        let prev_block = self.latest();
        let index = prev_block.index() + 1;
        let previous_digest = prev_block.digest().to_string();

        let transaction = Transaction::new(
            &self.sequence,
            sender.to_string(),
            receiver.to_string(),
            amount,
        );
        let mut block = Block::new(index, transaction, previous_digest, &self.hasher);

        info!("[⛏️] Mining block {} for {}", index, sender);
        block.mine(self.difficulty, &self.hasher, cancel)?;
        info!("[⛏️] Finish block!: {} (nonce {})", block.digest(), block.nonce());

        self.score_cache.apply(block.transaction());
        self.blocks.push(block);

        Ok(self.latest())
    }

    pub fn submit(&mut self, submission: &Submission, cancel: &CancelToken) -> Result<&Block> {
        self.append_transaction(
            &submission.sender,
            &submission.receiver,
            submission.amount,
            cancel,
        )
    }

    /// Rescans every block after genesis.
    pub fn scores(&self) -> BTreeMap<String, i64> {
        self.rescan().into_map()
    }

    fn rescan(&self) -> ScoreBoard {
        ScoreBoard::from_transactions(self.blocks.iter().skip(1).map(Block::transaction))
    }

    pub fn score(&self, participant: &str) -> i64 {
        self.score_cache.score(participant)
    }

    pub fn is_banned(&self, participant: &str) -> bool {
        self.score_cache.is_banned(participant, self.ban_threshold)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            blocks: self.blocks.iter().map(BlockView::from).collect(),
            scores: self.scores(),
            difficulty: self.difficulty,
        }
    }

    /// Audits the whole chain: genesis shape, index succession, digest
    /// links, proof-of-work and the score cache.
    pub fn validate(&self) -> Result<()> {
        let genesis = self
            .blocks
            .first()
            .ok_or_else(|| violation(0, "missing genesis block"))?;

        if genesis.index() != 0 {
            return Err(violation(genesis.index(), "genesis index is not 0"));
        }
        if genesis.previous_digest() != GENESIS_PREVIOUS_DIGEST {
            return Err(violation(0, "genesis previous digest is not the sentinel"));
        }
        if !genesis.validate(&self.hasher) {
            return Err(violation(0, "digest mismatch"));
        }

        for pair in self.blocks.windows(2) {
            let (prev, block) = (&pair[0], &pair[1]);

            if block.index() != prev.index() + 1 {
                return Err(violation(
                    block.index(),
                    &format!("expected index {}", prev.index() + 1),
                ));
            }
            if block.previous_digest() != prev.digest() {
                return Err(violation(block.index(), "previous digest link mismatch"));
            }
            if !block.validate(&self.hasher) {
                return Err(violation(block.index(), "digest mismatch"));
            }
            if !block.meets_difficulty(self.difficulty) {
                return Err(violation(
                    block.index(),
                    &format!("digest does not meet difficulty {}", self.difficulty),
                ));
            }
        }

        if self.rescan() != self.score_cache {
            return Err(violation(
                self.latest().index(),
                "score cache diverged from rescan",
            ));
        }

        Ok(())
    }
}

fn violation(index: u64, reason: &str) -> LedgerError {
    LedgerError::IntegrityViolation {
        index,
        reason: reason.to_string(),
    }
}
