use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::r#trait::DocumentStore;
use crate::error::StoreError;

/// In-memory document store holding the serialized JSON text.
///
/// Intended for tests. Saves can be made to fail on demand.
#[derive(Debug)]
pub struct InMemoryStore<T> {
    label: PathBuf,
    json: RefCell<Option<String>>,
    fail_saves: Cell<bool>,
    saves: Cell<usize>,
    _document: PhantomData<fn() -> T>,
}

impl<T> InMemoryStore<T> {
    pub fn new(label: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            json: RefCell::new(None),
            fail_saves: Cell::new(false),
            saves: Cell::new(0),
            _document: PhantomData,
        }
    }

    /// Start with raw text already "on disk" (need not be valid JSON).
    pub fn with_json(label: impl Into<PathBuf>, json: impl Into<String>) -> Self {
        let store = Self::new(label);
        *store.json.borrow_mut() = Some(json.into());
        store
    }

    pub fn contents(&self) -> Option<String> {
        self.json.borrow().clone()
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl<T> DocumentStore<T> for InMemoryStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Option<T>, StoreError> {
        match self.json.borrow().as_deref() {
            None => Ok(None),
            Some(text) => serde_json::from_str(text)
                .map(Some)
                .map_err(|source| StoreError::Malformed {
                    path: self.label.clone(),
                    source,
                }),
        }
    }

    fn save(&self, document: &T) -> Result<(), StoreError> {
        if self.fail_saves.get() {
            return Err(StoreError::Io {
                path: self.label.clone(),
                source: std::io::Error::other("simulated write failure"),
            });
        }
        let json = serde_json::to_string_pretty(document).map_err(StoreError::Encode)?;
        *self.json.borrow_mut() = Some(json);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_store::{load_inventory, load_users};
    use stockroom_auth::{Role, UserDirectory};
    use stockroom_inventory::Inventory;

    #[test]
    fn missing_user_document_gets_three_defaults() {
        let store: InMemoryStore<UserDirectory> = InMemoryStore::new("memory:users");
        let loaded = load_users(&store).unwrap();
        assert!(loaded.created);
        assert_eq!(loaded.document.len(), 3);
        assert_eq!(store.save_count(), 1);

        let persisted: serde_json::Value =
            serde_json::from_str(&store.contents().unwrap()).unwrap();
        for role in Role::ALL {
            assert_eq!(persisted[role.as_str()]["role"], role.as_str());
        }
    }

    #[test]
    fn existing_document_is_not_rewritten() {
        let store: InMemoryStore<UserDirectory> = InMemoryStore::with_json(
            "memory:users",
            r#"{"solo": {"password": "pass", "role": "admin"}}"#,
        );
        let loaded = load_users(&store).unwrap();
        assert!(!loaded.created);
        assert_eq!(loaded.document.len(), 1);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn empty_user_map_is_invalid() {
        let store: InMemoryStore<UserDirectory> = InMemoryStore::with_json("memory:users", "{}");
        assert!(matches!(load_users(&store), Err(StoreError::Invalid { .. })));
        assert_eq!(store.contents().as_deref(), Some("{}"));
    }

    #[test]
    fn missing_inventory_document_is_empty_array() {
        let store: InMemoryStore<Inventory> = InMemoryStore::new("memory:inventory");
        let loaded = load_inventory(&store).unwrap();
        assert!(loaded.created);
        assert!(loaded.document.is_empty());
        assert_eq!(store.contents().as_deref(), Some("[]"));
    }

    #[test]
    fn corrupt_documents_surface_and_are_kept() {
        let store: InMemoryStore<Inventory> = InMemoryStore::with_json("memory:inventory", "[{]");
        assert!(matches!(load_inventory(&store), Err(StoreError::Malformed { .. })));
        assert_eq!(store.contents().as_deref(), Some("[{]"));

        let dupes: InMemoryStore<Inventory> = InMemoryStore::with_json(
            "memory:inventory",
            r#"[{"name": "a", "quantity": 1, "price": 1}, {"name": "a", "quantity": 1, "price": 1}]"#,
        );
        assert!(matches!(load_inventory(&dupes), Err(StoreError::Invalid { .. })));
    }

    #[test]
    fn failing_saves_report_io_errors() {
        let store: InMemoryStore<Vec<u8>> = InMemoryStore::new("memory:bytes");
        store.set_fail_saves(true);
        assert!(matches!(store.save(&vec![1]), Err(StoreError::Io { .. })));
        assert!(store.contents().is_none());
    }
}
