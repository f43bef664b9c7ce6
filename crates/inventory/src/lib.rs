//! Inventory domain module.
//!
//! This crate contains business rules for inventory, implemented purely as
//! deterministic domain logic (no file or terminal IO). Callers pass the
//! acting username and timestamp explicitly.

pub mod inventory;
pub mod item;
pub mod journal;
pub mod report;

pub use inventory::{Adjustment, Inventory, PriceChange};
pub use item::{InventoryItem, NewItem, StockStatus, DEFAULT_CATEGORY, DEFAULT_REORDER_LEVEL};
pub use journal::{Journal, Transaction, TransactionKind};
pub use report::{CategoryValue, TopItem, ValueReport};
