use std::collections::BTreeMap;

use serde::Serialize;

use super::Transaction;

/// Reward for each party of a positive transfer.
pub const POSITIVE_REWARD: i64 = 1;
/// Penalty applied to the sender of a non-positive transfer.
pub const NEGATIVE_PENALTY: i64 = 5;

/// Reputation per participant, folded over transactions in chain order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBoard {
    scores: BTreeMap<String, i64>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut board = ScoreBoard::new();
        for transaction in transactions {
            board.apply(transaction);
        }
        board
    }

    pub fn apply(&mut self, transaction: &Transaction) {
        // both parties are registered even when only the sender is scored
        self.scores
            .entry(transaction.receiver().to_string())
            .or_insert(0);
        let sender = self
            .scores
            .entry(transaction.sender().to_string())
            .or_insert(0);

        if transaction.amount() > 0 {
            *sender += POSITIVE_REWARD;
            if let Some(receiver) = self.scores.get_mut(transaction.receiver()) {
                *receiver += POSITIVE_REWARD;
            }
        } else {
            *sender -= NEGATIVE_PENALTY;
        }
    }

    /// Unknown participants score 0.
    pub fn score(&self, participant: &str) -> i64 {
        self.scores.get(participant).copied().unwrap_or(0)
    }

    pub fn is_banned(&self, participant: &str, threshold: i64) -> bool {
        self.score(participant) < threshold
    }

    pub fn as_map(&self) -> &BTreeMap<String, i64> {
        &self.scores
    }

    pub fn into_map(self) -> BTreeMap<String, i64> {
        self.scores
    }
}
