use crate::errors::UopResult;
use crate::store::NativeCollection;
use std::ops::Deref;
use std::sync::Arc;

/// Driver side of one named database on the store server.
pub trait NativeDatabaseProvider: Send + Sync {
    fn name(&self) -> String;

    fn list_collection_names(&self) -> UopResult<Vec<String>>;

    /// Creates a collection. Creating an existing collection returns it.
    fn create_collection(&self, name: &str) -> UopResult<NativeCollection>;

    /// Returns an existing collection.
    ///
    /// # Errors
    ///
    /// Returns `CollectionNotFound` when the collection does not exist.
    fn collection(&self, name: &str) -> UopResult<NativeCollection>;
}

/// Handle to a named database of the store.
#[derive(Clone)]
pub struct NativeDatabase {
    inner: Arc<dyn NativeDatabaseProvider>,
}

impl NativeDatabase {
    pub fn new<T: NativeDatabaseProvider + 'static>(inner: T) -> Self {
        NativeDatabase {
            inner: Arc::new(inner),
        }
    }

    pub fn has_collection(&self, name: &str) -> UopResult<bool> {
        Ok(self
            .inner
            .list_collection_names()?
            .iter()
            .any(|existing| existing == name))
    }
}

impl Deref for NativeDatabase {
    type Target = Arc<dyn NativeDatabaseProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
