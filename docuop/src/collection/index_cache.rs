use crate::common::{Document, Value, DEFAULT_INDEX_CACHE_SIZE};
use crate::criteria::Criteria;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

/// Local index of recently inserted documents, keyed by native identifier.
///
/// Entries are dropped whenever a write could have changed them: the entry
/// of the targeted identifier for id-only criteria, every entry otherwise.
pub(crate) struct LocalIndexCache {
    entries: Mutex<LruCache<Value, Document>>,
}

impl LocalIndexCache {
    pub(crate) fn new(capacity: usize) -> LocalIndexCache {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        LocalIndexCache {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub(crate) fn index(&self, id: Value, document: Document) {
        self.entries.lock().put(id, document);
    }

    pub(crate) fn get(&self, id: &Value) -> Option<Document> {
        self.entries.lock().get(id).cloned()
    }

    pub(crate) fn unindex_id(&self, id: &Value) {
        self.entries.lock().pop(id);
    }

    pub(crate) fn unindex(&self, criteria: &Criteria) {
        match criteria.targeted_id() {
            Some(id) => self.unindex_id(id),
            None => self.entries.lock().clear(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

impl Default for LocalIndexCache {
    fn default() -> Self {
        LocalIndexCache::new(DEFAULT_INDEX_CACHE_SIZE)
    }
}
