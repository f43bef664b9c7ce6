use std::path::Path;

use crate::error::StoreError;

/// Storage for a single JSON document of type `T`.
pub trait DocumentStore<T> {
    /// Read the document. `Ok(None)` means it does not exist yet; anything
    /// present but unreadable or unparsable is an error.
    fn load(&self) -> Result<Option<T>, StoreError>;

    /// Replace the stored document with `document`.
    fn save(&self, document: &T) -> Result<(), StoreError>;

    /// Where the document lives (used in errors and logs).
    fn location(&self) -> &Path;
}

/// A loaded document and whether it had to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub document: T,
    pub created: bool,
}

/// Load the document, or build it with `default` and persist it when absent.
///
/// Corrupt documents surface as errors and are never overwritten.
pub fn load_or_create<T, S>(store: &S, default: impl FnOnce() -> T) -> Result<Loaded<T>, StoreError>
where
    S: DocumentStore<T> + ?Sized,
{
    if let Some(document) = store.load()? {
        tracing::info!(path = %store.location().display(), "loaded document");
        return Ok(Loaded {
            document,
            created: false,
        });
    }

    let document = default();
    store.save(&document)?;
    tracing::info!(path = %store.location().display(), "created default document");
    Ok(Loaded {
        document,
        created: true,
    })
}
