use crate::errors::{ErrorKind, UopError, UopResult};
use crate::store::memory::InMemoryCollection;
use crate::store::{NativeCollection, NativeDatabaseProvider};
use dashmap::DashMap;
use std::sync::Arc;

/// A database of the in-memory driver.
#[derive(Clone)]
pub struct InMemoryDatabase {
    inner: Arc<InMemoryDatabaseInner>,
}

struct InMemoryDatabaseInner {
    name: String,
    collections: DashMap<String, InMemoryCollection>,
}

impl InMemoryDatabase {
    pub fn new(name: &str) -> InMemoryDatabase {
        InMemoryDatabase {
            inner: Arc::new(InMemoryDatabaseInner {
                name: name.to_string(),
                collections: DashMap::new(),
            }),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.inner.collections.is_empty()
    }

    /// Empties every collection, so handles still held elsewhere see no data.
    pub(crate) fn clear(&self) {
        for entry in self.inner.collections.iter() {
            entry.value().clear();
        }
        self.inner.collections.clear();
    }
}

impl NativeDatabaseProvider for InMemoryDatabase {
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn list_collection_names(&self) -> UopResult<Vec<String>> {
        let mut names: Vec<String> = self
            .inner
            .collections
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        Ok(names)
    }

    fn create_collection(&self, name: &str) -> UopResult<NativeCollection> {
        if name.is_empty() || name.starts_with('$') || name.contains('\0') {
            log::error!("Invalid collection name '{}'", name);
            return Err(UopError::new(
                &format!("Invalid collection name '{}'", name),
                ErrorKind::InvalidOperation,
            ));
        }

        let collection = self
            .inner
            .collections
            .entry(name.to_string())
            .or_insert_with(|| {
                log::debug!("Created collection {} in {}", name, self.inner.name);
                InMemoryCollection::new(name)
            })
            .clone();
        Ok(NativeCollection::new(collection))
    }

    fn collection(&self, name: &str) -> UopResult<NativeCollection> {
        match self.inner.collections.get(name) {
            Some(entry) => Ok(NativeCollection::new(entry.value().clone())),
            None => {
                log::error!("Collection {} not found in {}", name, self.inner.name);
                Err(UopError::new(
                    &format!("Collection {} not found", name),
                    ErrorKind::CollectionNotFound,
                ))
            }
        }
    }
}
