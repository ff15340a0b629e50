use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LedgerError, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    sender: String,
    receiver: String,
    amount: i64,
    sequence_id: u64,
}

impl Transaction {
    /// Builds a transaction stamped with the next id from `sequence`.
    pub fn new(
        sequence: &SequenceGenerator,
        sender: String,
        receiver: String,
        amount: i64,
    ) -> Transaction {
        Transaction {
            sender,
            receiver,
            amount,
            sequence_id: sequence.next_id(),
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn sequence_id(&self) -> u64 {
        self.sequence_id
    }

    /// `sender:receiver:amount:sequence_id`.
    ///
    /// Fields are not escaped: identifiers containing `:` can make two
    /// different transactions share a canonical form.
    pub fn canonical_string(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.sender, self.receiver, self.amount, self.sequence_id
        )
    }
}

/// Source of transaction sequence ids. Ids are strictly increasing and
/// never reused for the lifetime of the generator.
#[derive(Debug, Default)]
pub struct SequenceGenerator {
    next: AtomicU64,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Id the next transaction will receive.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

/// A validated "submit transaction" request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub sender: String,
    pub receiver: String,
    pub amount: i64,
}

impl Submission {
    pub fn new(sender: &str, receiver: &str, amount: &str) -> Result<Submission> {
        let sender = parse_identifier("sender", sender)?;
        let receiver = parse_identifier("receiver", receiver)?;

        let amount = amount.trim().parse::<i64>().map_err(|_| {
            LedgerError::MalformedInput(format!("amount {:?} is not an integer", amount))
        })?;

        Ok(Submission {
            sender,
            receiver,
            amount,
        })
    }

    /// Parses `{"sender": .., "receiver": .., "amount": ..}`. The amount may
    /// be a JSON integer or a string holding one.
    pub fn from_json(body: &str) -> Result<Submission> {
        let value: Value = serde_json::from_str(body.trim().trim_end_matches('\0'))
            .map_err(|e| LedgerError::MalformedInput(format!("invalid JSON body: {}", e)))?;

        let sender = string_field(&value, "sender")?;
        let receiver = string_field(&value, "receiver")?;

        let amount = match value.get("amount") {
            Some(Value::Number(number)) => number.as_i64().ok_or_else(|| {
                LedgerError::MalformedInput(format!("amount {} is not an integer", number))
            })?,
            Some(Value::String(text)) => return Submission::new(sender, receiver, text),
            Some(other) => {
                return Err(LedgerError::MalformedInput(format!(
                    "amount {} is not an integer",
                    other
                )))
            }
            None => return Err(LedgerError::MalformedInput("missing amount".into())),
        };

        Ok(Submission {
            sender: parse_identifier("sender", sender)?,
            receiver: parse_identifier("receiver", receiver)?,
            amount,
        })
    }
}

fn parse_identifier(field: &str, value: &str) -> Result<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(LedgerError::MalformedInput(format!("missing {}", field)));
    }

    Ok(value.to_string())
}

fn string_field<'a>(value: &'a Value, field: &str) -> Result<&'a str> {
    match value.get(field) {
        Some(Value::String(text)) => Ok(text),
        Some(_) => Err(LedgerError::MalformedInput(format!(
            "{} must be a string",
            field
        ))),
        None => Err(LedgerError::MalformedInput(format!("missing {}", field))),
    }
}
