use crate::common::{Document, ObjectId, SortOrder, Value, NATIVE_ID, NATIVE_ID_INDEX};
use crate::errors::{ErrorKind, UopError, UopResult};
use crate::store::memory::filter::NativeFilter;
use crate::store::memory::update::NativeUpdate;
use crate::store::{IndexModel, NativeCollectionProvider, NativeFindOptions, UpdateResult};
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::sync::Arc;

/// A collection of the in-memory driver.
///
/// Documents are kept in insertion order, keyed by their native identifier.
#[derive(Clone)]
pub struct InMemoryCollection {
    inner: Arc<InMemoryCollectionInner>,
}

impl InMemoryCollection {
    pub fn new(name: &str) -> InMemoryCollection {
        InMemoryCollection {
            inner: Arc::new(InMemoryCollectionInner::new(name)),
        }
    }

    /// Removes every document and secondary index.
    pub(crate) fn clear(&self) {
        self.inner.documents.write().clear();
        self.inner.indexes.write().truncate(1);
    }
}

impl NativeCollectionProvider for InMemoryCollection {
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn insert_one(&self, document: Document) -> UopResult<Value> {
        self.inner.insert_one(document)
    }

    fn find(&self, filter: &Document, options: &NativeFindOptions) -> UopResult<Vec<Document>> {
        self.inner.find(filter, options)
    }

    fn find_one(&self, filter: &Document) -> UopResult<Option<Document>> {
        let options = NativeFindOptions::new().limit(1);
        Ok(self.inner.find(filter, &options)?.into_iter().next())
    }

    fn update_many(&self, filter: &Document, update: &Document) -> UopResult<UpdateResult> {
        self.inner.update(filter, update, false)
    }

    fn update_one(&self, filter: &Document, update: &Document) -> UopResult<UpdateResult> {
        self.inner.update(filter, update, true)
    }

    fn delete_many(&self, filter: &Document) -> UopResult<u64> {
        self.inner.delete_many(filter)
    }

    fn count_documents(&self, filter: &Document) -> UopResult<u64> {
        self.inner.count_documents(filter)
    }

    fn distinct(&self, field: &str, filter: &Document) -> UopResult<Vec<Value>> {
        self.inner.distinct(field, filter)
    }

    fn index_information(&self) -> UopResult<Vec<IndexModel>> {
        Ok(self.inner.indexes.read().clone())
    }

    fn create_index(&self, keys: &[(String, SortOrder)]) -> UopResult<String> {
        self.inner.create_index(keys)
    }
}

struct InMemoryCollectionInner {
    name: String,
    documents: RwLock<IndexMap<Value, Document>>,
    indexes: RwLock<Vec<IndexModel>>,
}

impl InMemoryCollectionInner {
    fn new(name: &str) -> InMemoryCollectionInner {
        let id_index = IndexModel {
            name: NATIVE_ID_INDEX.to_string(),
            keys: vec![(NATIVE_ID.to_string(), SortOrder::Ascending)],
        };
        InMemoryCollectionInner {
            name: name.to_string(),
            documents: RwLock::new(IndexMap::new()),
            indexes: RwLock::new(vec![id_index]),
        }
    }

    fn insert_one(&self, mut document: Document) -> UopResult<Value> {
        let id = match document.get(NATIVE_ID) {
            Some(id) if !id.is_null() => id.clone(),
            _ => {
                let id = Value::from(ObjectId::new());
                document.put(NATIVE_ID, id.clone())?;
                id
            }
        };

        let mut documents = self.documents.write();
        if documents.contains_key(&id) {
            log::error!("Duplicate key {} in collection {}", id, self.name);
            return Err(UopError::new(
                &format!("Duplicate key {} in collection {}", id, self.name),
                ErrorKind::DuplicateKey,
            ));
        }
        documents.insert(id.clone(), document);
        Ok(id)
    }

    fn find(&self, filter: &Document, options: &NativeFindOptions) -> UopResult<Vec<Document>> {
        let filter = NativeFilter::compile(filter)?;
        let documents = self.documents.read();

        let mut matches: Vec<&Document> = documents.values().filter(|d| filter.matches(d)).collect();
        if !options.sort.is_empty() {
            matches.sort_by(|a, b| compare_by_keys(a, b, &options.sort));
        }

        let limit = options.limit.unwrap_or(usize::MAX);
        matches
            .into_iter()
            .take(limit)
            .map(|doc| match &options.projection {
                Some(fields) => project(doc, fields),
                None => Ok(doc.clone()),
            })
            .collect()
    }

    fn update(&self, filter: &Document, update: &Document, first_only: bool) -> UopResult<UpdateResult> {
        let filter = NativeFilter::compile(filter)?;
        let update = NativeUpdate::parse(update)?;

        let mut documents = self.documents.write();
        let mut result = UpdateResult::default();
        let mut changes = Vec::new();
        for (id, doc) in documents.iter() {
            if !filter.matches(doc) {
                continue;
            }
            result.matched_count += 1;
            let updated = update.apply(doc)?;
            if &updated != doc {
                changes.push((id.clone(), updated));
            }
            if first_only {
                break;
            }
        }

        result.modified_count = changes.len() as u64;
        for (id, updated) in changes {
            documents.insert(id, updated);
        }
        Ok(result)
    }

    fn delete_many(&self, filter: &Document) -> UopResult<u64> {
        let filter = NativeFilter::compile(filter)?;
        let mut documents = self.documents.write();
        let before = documents.len();
        documents.retain(|_, doc| !filter.matches(doc));
        Ok((before - documents.len()) as u64)
    }

    fn count_documents(&self, filter: &Document) -> UopResult<u64> {
        let filter = NativeFilter::compile(filter)?;
        let documents = self.documents.read();
        Ok(documents.values().filter(|d| filter.matches(d)).count() as u64)
    }

    fn distinct(&self, field: &str, filter: &Document) -> UopResult<Vec<Value>> {
        let filter = NativeFilter::compile(filter)?;
        let documents = self.documents.read();

        let mut values = IndexSet::new();
        for doc in documents.values().filter(|d| filter.matches(d)) {
            match doc.get_path(field) {
                Some(Value::Array(items)) => values.extend(items.iter().cloned()),
                Some(value) => {
                    values.insert(value.clone());
                }
                None => {}
            }
        }
        Ok(values.into_iter().collect())
    }

    fn create_index(&self, keys: &[(String, SortOrder)]) -> UopResult<String> {
        if keys.is_empty() {
            log::error!("Cannot create an index without keys on {}", self.name);
            return Err(UopError::new(
                "Cannot create an index without keys",
                ErrorKind::InvalidOperation,
            ));
        }

        let mut indexes = self.indexes.write();
        if let Some(existing) = indexes.iter().find(|index| index.keys == keys) {
            return Ok(existing.name.clone());
        }

        let model = IndexModel::from_keys(keys.to_vec());
        let name = model.name.clone();
        log::debug!("Created index {} on {}", name, self.name);
        indexes.push(model);
        Ok(name)
    }
}

fn compare_by_keys(a: &Document, b: &Document, keys: &[(String, SortOrder)]) -> Ordering {
    for (field, order) in keys {
        let left = a.get_path(field).unwrap_or(&Value::Null);
        let right = b.get_path(field).unwrap_or(&Value::Null);
        let ordering = match order {
            SortOrder::Ascending => left.cmp(right),
            SortOrder::Descending => right.cmp(left),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Keeps the identifier and the listed fields of a document.
fn project(doc: &Document, fields: &[String]) -> UopResult<Document> {
    let mut projected = Document::new();
    if let Some(id) = doc.get(NATIVE_ID) {
        projected.put(NATIVE_ID, id.clone())?;
    }
    for field in fields.iter().unique() {
        if let Some(value) = doc.get_path(field) {
            projected.put_path(field, value.clone())?;
        }
    }
    Ok(projected)
}
