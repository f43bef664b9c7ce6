//! Whole-document JSON persistence.
//!
//! Each store holds exactly one document (the user map or the item list) and
//! always reads and writes it in full. There is no locking: last writer wins.

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;
pub use r#trait::{load_or_create, DocumentStore, Loaded};

use stockroom_auth::UserDirectory;
use stockroom_inventory::Inventory;

use crate::error::StoreError;

/// Load the user map, writing the template accounts if the document is missing.
///
/// A map without any admin account (including `{}`) is rejected: nobody
/// could ever fix it from inside the tool.
pub fn load_users<S>(store: &S) -> Result<Loaded<UserDirectory>, StoreError>
where
    S: DocumentStore<UserDirectory> + ?Sized,
{
    let loaded = load_or_create(store, UserDirectory::with_defaults)?;
    loaded
        .document
        .validate()
        .map_err(|source| StoreError::Invalid {
            path: store.location().to_path_buf(),
            source,
        })?;
    Ok(loaded)
}

/// Load the item list, writing an empty list if the document is missing.
///
/// A list that parses but breaks item rules (duplicate names, negative
/// prices) is rejected rather than repaired.
pub fn load_inventory<S>(store: &S) -> Result<Loaded<Inventory>, StoreError>
where
    S: DocumentStore<Inventory> + ?Sized,
{
    let loaded = load_or_create(store, Inventory::new)?;
    loaded
        .document
        .validate()
        .map_err(|source| StoreError::Invalid {
            path: store.location().to_path_buf(),
            source,
        })?;
    Ok(loaded)
}
