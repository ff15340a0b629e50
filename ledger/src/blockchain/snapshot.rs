use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Block;

/// Read-only view of the ledger handed to the request layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub blocks: Vec<BlockView>,
    pub scores: BTreeMap<String, i64>,
    pub difficulty: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockView {
    pub index: u64,
    pub sender: String,
    pub receiver: String,
    pub amount: i64,
    pub digest: String,
    pub nonce: u64,
}

impl From<&Block> for BlockView {
    fn from(block: &Block) -> Self {
        let transaction = block.transaction();

        BlockView {
            index: block.index(),
            sender: transaction.sender().to_string(),
            receiver: transaction.receiver().to_string(),
            amount: transaction.amount(),
            digest: block.digest().to_string(),
            nonce: block.nonce(),
        }
    }
}

impl LedgerSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
