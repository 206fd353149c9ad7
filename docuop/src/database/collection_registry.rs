use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::errors::UopResult;
use crate::store::NativeCollection;
use std::collections::HashMap;

/// Raw collections already resolved by one database, by name.
#[derive(Clone)]
pub(crate) struct CollectionRegistry {
    collections: Atomic<HashMap<String, NativeCollection>>,
}

impl CollectionRegistry {
    pub(crate) fn new() -> CollectionRegistry {
        CollectionRegistry {
            collections: atomic(HashMap::new()),
        }
    }

    /// Returns the registered collection, resolving and registering it with
    /// `resolve` on first use.
    pub(crate) fn get_or_resolve<F>(&self, name: &str, resolve: F) -> UopResult<NativeCollection>
    where
        F: FnOnce() -> UopResult<NativeCollection>,
    {
        if let Some(collection) = self.collections.read_with(|map| map.get(name).cloned()) {
            return Ok(collection);
        }

        let collection = resolve()?;
        let registered = self.collections.write_with(|map| {
            map.entry(name.to_string())
                .or_insert_with(|| collection)
                .clone()
        });
        log::debug!("Registered collection {}", name);
        Ok(registered)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.collections.read_with(|map| map.contains_key(name))
    }

    pub(crate) fn len(&self) -> usize {
        self.collections.read_with(|map| map.len())
    }

    pub(crate) fn clear(&self) {
        self.collections.write_with(|map| map.clear());
    }
}
