//! Infrastructure layer: JSON document stores, config, and the desk that
//! ties authorization, domain rules and persistence together.

pub mod config;
pub mod desk;
pub mod document_store;
pub mod error;

#[cfg(test)]
mod integration_tests;

pub use config::StoreConfig;
pub use desk::{Desk, DeskResult, FileDesk};
pub use document_store::{DocumentStore, InMemoryStore, JsonFileStore, Loaded};
pub use error::{DeskError, StoreError};
