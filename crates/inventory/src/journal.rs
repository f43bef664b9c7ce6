//! In-memory transaction journal.
//!
//! Records every successful inventory mutation for the lifetime of the
//! process. It is not persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockroom_core::TransactionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Add,
    Restock,
    Sale,
    Price,
    Delete,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Add => "ADD",
            TransactionKind::Restock => "RESTOCK",
            TransactionKind::Sale => "SALE",
            TransactionKind::Price => "PRICE",
            TransactionKind::Delete => "DELETE",
        }
    }

    /// Restock for positive deltas, sale for negative ones.
    pub fn for_delta(delta: i64) -> Self {
        if delta > 0 {
            TransactionKind::Restock
        } else {
            TransactionKind::Sale
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub at: DateTime<Utc>,
    pub kind: TransactionKind,
    pub item: String,
    pub quantity: u64,
    pub notes: String,
    pub user: String,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        item: impl Into<String>,
        quantity: u64,
        notes: impl Into<String>,
        user: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            at,
            kind,
            item: item.into(),
            quantity,
            notes: notes.into(),
            user: user.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Vec<Transaction>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, transaction: Transaction) {
        self.entries.push(transaction);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&Transaction> {
        self.entries.iter().rev().take(limit).collect()
    }
}
