use crate::common::{Document, SortOrder, Value};
use crate::errors::UopResult;
use std::ops::Deref;
use std::sync::Arc;

/// Options of a native `find` call.
///
/// `projection` lists the fields to keep; when it is `None` whole documents
/// are returned. The native identifier is always kept. `sort` keys apply in
/// order; an empty `sort` means store order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeFindOptions {
    pub projection: Option<Vec<String>>,
    pub sort: Vec<(String, SortOrder)>,
    pub limit: Option<usize>,
}

impl NativeFindOptions {
    pub fn new() -> NativeFindOptions {
        NativeFindOptions::default()
    }

    pub fn projection(mut self, fields: Vec<String>) -> Self {
        self.projection = Some(fields);
        self
    }

    pub fn sort(mut self, field: &str, order: SortOrder) -> Self {
        self.sort.push((field.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Native metadata of one index: its store assigned name and its ordered keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexModel {
    pub name: String,
    pub keys: Vec<(String, SortOrder)>,
}

impl IndexModel {
    /// Builds an index model named the way document stores usually name
    /// indexes: `field_1_other_-1`.
    pub fn from_keys(keys: Vec<(String, SortOrder)>) -> IndexModel {
        let name = keys
            .iter()
            .map(|(field, order)| format!("{}_{}", field, order.direction()))
            .collect::<Vec<_>>()
            .join("_");
        IndexModel { name, keys }
    }
}

/// Outcome of a native update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Driver side of a single physical collection.
///
/// Every method is one request against the store. Implementations report
/// failures as [UopError](crate::errors::UopError) values that the adaptor
/// layer hands back unchanged.
pub trait NativeCollectionProvider: Send + Sync {
    fn name(&self) -> String;

    /// Inserts a stored document and returns its native identifier.
    ///
    /// A document without an identifier gets a store generated one.
    fn insert_one(&self, document: Document) -> UopResult<Value>;

    fn find(&self, filter: &Document, options: &NativeFindOptions) -> UopResult<Vec<Document>>;

    fn find_one(&self, filter: &Document) -> UopResult<Option<Document>>;

    fn update_many(&self, filter: &Document, update: &Document) -> UopResult<UpdateResult>;

    fn update_one(&self, filter: &Document, update: &Document) -> UopResult<UpdateResult>;

    /// Removes every match and returns the number removed.
    fn delete_many(&self, filter: &Document) -> UopResult<u64>;

    fn count_documents(&self, filter: &Document) -> UopResult<u64>;

    /// Distinct values of `field` among the matches, in first-seen order.
    fn distinct(&self, field: &str, filter: &Document) -> UopResult<Vec<Value>>;

    fn index_information(&self) -> UopResult<Vec<IndexModel>>;

    /// Creates an index and returns its name.
    fn create_index(&self, keys: &[(String, SortOrder)]) -> UopResult<String>;
}

/// Handle to a physical collection of the store.
///
/// Clones share the same driver handle.
#[derive(Clone)]
pub struct NativeCollection {
    inner: Arc<dyn NativeCollectionProvider>,
}

impl NativeCollection {
    pub fn new<T: NativeCollectionProvider + 'static>(inner: T) -> Self {
        NativeCollection {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for NativeCollection {
    type Target = Arc<dyn NativeCollectionProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_options_builder() {
        let options = NativeFindOptions::new()
            .projection(vec!["_id".to_string()])
            .sort("age", SortOrder::Descending)
            .limit(2);
        assert_eq!(options.projection, Some(vec!["_id".to_string()]));
        assert_eq!(options.sort, vec![("age".to_string(), SortOrder::Descending)]);
        assert_eq!(options.limit, Some(2));
    }

    #[test]
    fn index_model_name() {
        let model = IndexModel::from_keys(vec![
            ("name".to_string(), SortOrder::Ascending),
            ("age".to_string(), SortOrder::Descending),
        ]);
        assert_eq!(model.name, "name_1_age_-1");
        assert_eq!(model.keys.len(), 2);
    }

    #[test]
    fn update_result_default_is_zero() {
        let result = UpdateResult::default();
        assert_eq!(result.matched_count, 0);
        assert_eq!(result.modified_count, 0);
    }
}
