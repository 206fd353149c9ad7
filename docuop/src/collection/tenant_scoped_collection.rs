use crate::collection::{FindOptions, FindResult, LocalIndexCache, TenantModifier};
use crate::common::{Document, ObjectId, SortOrder, Value, LOGICAL_ID, NATIVE_ID, OP_SET};
use crate::criteria::{Criteria, CriteriaTranslator};
use crate::errors::UopResult;
use crate::store::{NativeCollection, NativeFindOptions, UpdateResult};
use std::sync::Arc;

/// What [TenantScopedCollection::remove] removes: the matches of a criteria,
/// or the single document with a given identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveTarget {
    Criteria(Criteria),
    Id(Value),
}

impl From<Criteria> for RemoveTarget {
    fn from(criteria: Criteria) -> Self {
        RemoveTarget::Criteria(criteria)
    }
}

impl From<Document> for RemoveTarget {
    fn from(criteria: Document) -> Self {
        RemoveTarget::Criteria(Criteria::from(criteria))
    }
}

/// A document value selects by criteria; any other value is an identifier.
impl From<Value> for RemoveTarget {
    fn from(value: Value) -> Self {
        match value {
            Value::Document(criteria) => RemoveTarget::from(criteria),
            id => RemoveTarget::Id(id),
        }
    }
}

macro_rules! remove_target_from_id {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RemoveTarget {
                fn from(id: $t) -> Self {
                    RemoveTarget::Id(Value::from(id))
                }
            }
        )*
    };
}

remove_target_from_id!(i32, i64, u32, &str, String, ObjectId);

/// A physical collection seen through one tenant.
///
/// Every call
/// 1. renames the logical identifier `id` to the native `_id`,
/// 2. translates criteria into a native filter,
/// 3. applies the tenant modifier to that filter (and to inserted documents),
/// 4. makes exactly one request to the store,
/// 5. renames `_id` back to `id` in returned documents.
///
/// Store errors are returned unchanged. Clones share the same collection
/// handle and local index cache.
///
/// # Examples
///
/// ```rust,ignore
/// let items = db.managed_collection("items", Some(TenantModifier::scoped_to("tenant", "acme")))?;
/// let id = items.insert(doc! { id: 7, size: 3 })?;
/// let found = items.find_one(doc! { id: 7 })?;
/// ```
#[derive(Clone)]
pub struct TenantScopedCollection {
    inner: Arc<TenantScopedCollectionInner>,
}

struct TenantScopedCollectionInner {
    collection: NativeCollection,
    translator: CriteriaTranslator,
    tenant_modifier: Option<TenantModifier>,
    index_cache: Option<LocalIndexCache>,
}

impl TenantScopedCollection {
    pub fn new(collection: NativeCollection, tenant_modifier: Option<TenantModifier>) -> Self {
        TenantScopedCollection::build(collection, tenant_modifier, None)
    }

    /// Like [TenantScopedCollection::new], keeping a local index of up to
    /// `capacity` inserted documents.
    pub fn indexed(
        collection: NativeCollection,
        tenant_modifier: Option<TenantModifier>,
        capacity: usize,
    ) -> Self {
        TenantScopedCollection::build(
            collection,
            tenant_modifier,
            Some(LocalIndexCache::new(capacity)),
        )
    }

    fn build(
        collection: NativeCollection,
        tenant_modifier: Option<TenantModifier>,
        index_cache: Option<LocalIndexCache>,
    ) -> Self {
        TenantScopedCollection {
            inner: Arc::new(TenantScopedCollectionInner {
                collection,
                translator: CriteriaTranslator::new(),
                tenant_modifier,
                index_cache,
            }),
        }
    }

    pub fn name(&self) -> String {
        self.inner.collection.name()
    }

    pub fn is_tenant_scoped(&self) -> bool {
        self.inner.tenant_modifier.is_some()
    }

    pub fn is_indexed(&self) -> bool {
        self.inner.index_cache.is_some()
    }

    pub fn translator(&self) -> &CriteriaTranslator {
        &self.inner.translator
    }

    /// The locally indexed document with this identifier, if any.
    ///
    /// The local index only sees writes made through this handle, so the
    /// store may hold a newer version of the document.
    pub fn cached<T: Into<Value>>(&self, id: T) -> Option<Document> {
        let cache = self.inner.index_cache.as_ref()?;
        let doc = cache.get(&id.into())?;
        Some(self.inner.translator.denormalize_id_from_storage(doc))
    }

    /// Criteria matching documents whose `column` ends with `_<uuid>`.
    pub fn column_class_check(&self, column: &str, uuid: &str) -> Criteria {
        Criteria::column_class_check(&self.inner.translator.native_field(column), uuid)
    }

    /// Inserts a document and returns its native identifier.
    pub fn insert(&self, document: Document) -> UopResult<Value> {
        let stored = self.inner.translator.normalize_id_for_storage(document);
        let scoped = self.with_tenant(stored.clone());
        let id = self.inner.collection.insert_one(scoped)?;

        // the store write succeeded; indexing must not fail the insert
        if let Some(cache) = &self.inner.index_cache {
            let indexed: Document = stored
                .into_iter()
                .chain(std::iter::once((NATIVE_ID.to_string(), id.clone())))
                .collect();
            cache.index(id.clone(), indexed);
        }
        Ok(id)
    }

    /// Finds the documents matching `criteria`.
    ///
    /// A limit of one, or `ids_only`, discards the ordering. With exactly one
    /// projected field the result holds that field's values, `null` where a
    /// match lacks it.
    pub fn find<C: Into<Criteria>>(&self, criteria: C, options: FindOptions) -> UopResult<FindResult> {
        let mut options = options;
        if options.limit == Some(1) {
            options.order_by.clear();
        }
        if options.ids_only {
            options.projection = Some(vec![NATIVE_ID.to_string()]);
            options.order_by.clear();
        }

        let translator = &self.inner.translator;
        let projection: Option<Vec<String>> = options
            .projection
            .as_ref()
            .filter(|fields| !fields.is_empty())
            .map(|fields| fields.iter().map(|f| translator.native_field(f)).collect());
        let native_options = NativeFindOptions {
            projection: projection.clone(),
            sort: options
                .sort_keys()
                .into_iter()
                .map(|(field, order)| (translator.native_field(&field), order))
                .collect(),
            limit: options.limit.filter(|limit| *limit > 0),
        };

        let filter = self.native_filter(&criteria.into());
        let found = self.inner.collection.find(&filter, &native_options)?;

        match projection.as_deref() {
            Some([field]) => Ok(FindResult::Values(
                found
                    .iter()
                    .map(|doc| doc.get_path(field).cloned().unwrap_or_default())
                    .collect(),
            )),
            _ => Ok(FindResult::Documents(
                translator.denormalize_id_from_storage(found),
            )),
        }
    }

    /// Finds the first document matching `criteria`. Always asks the store;
    /// the local index is never consulted.
    pub fn find_one<C: Into<Criteria>>(&self, criteria: C) -> UopResult<Option<Document>> {
        let filter = self.native_filter(&criteria.into());
        let found = self.inner.collection.find_one(&filter)?;
        Ok(self.inner.translator.denormalize_id_from_storage(found))
    }

    /// Updates every document matching `criteria`.
    ///
    /// With `partial` the modifications are set field by field; otherwise
    /// they are handed to the store as the complete update document.
    pub fn update<C: Into<Criteria>>(
        &self,
        criteria: C,
        modifications: Document,
        partial: bool,
    ) -> UopResult<UpdateResult> {
        let criteria = criteria.into();
        let filter = self.native_filter(&criteria);
        let update = self.native_update(modifications, partial)?;

        let result = self.inner.collection.update_many(&filter, &update);
        self.unindex(&criteria);
        result
    }

    /// Updates the document with the given native identifier.
    ///
    /// The tenant modifier is not applied.
    pub fn update_one<T: Into<Value>>(
        &self,
        id: T,
        modifications: Document,
        partial: bool,
    ) -> UopResult<UpdateResult> {
        let id = id.into();
        if self.is_tenant_scoped() {
            log::warn!(
                "update_one on {} by identifier {} bypasses tenant scoping",
                self.name(),
                id
            );
        }

        let filter = self.inner.translator.to_native(&Criteria::eq(NATIVE_ID, id.clone()));
        let update = self.native_update(modifications, partial)?;

        let result = self.inner.collection.update_one(&filter, &update);
        if let Some(cache) = &self.inner.index_cache {
            cache.unindex_id(&id);
        }
        result
    }

    /// Removes every document matching a criteria, or the document with an
    /// identifier, and returns the number removed.
    pub fn remove<T: Into<RemoveTarget>>(&self, target: T) -> UopResult<u64> {
        let criteria = match target.into() {
            RemoveTarget::Criteria(criteria) => criteria,
            RemoveTarget::Id(id) => Criteria::eq(NATIVE_ID, id),
        };
        self.unindex(&criteria);

        let filter = self.native_filter(&criteria);
        self.inner.collection.delete_many(&filter)
    }

    /// Counts the documents matching `criteria`; `None` counts all of the
    /// tenant's documents.
    pub fn count<C: Into<Criteria>>(&self, criteria: C) -> UopResult<u64> {
        let filter = self.native_filter(&criteria.into());
        self.inner.collection.count_documents(&filter)
    }

    /// Distinct values of `field` among the matches of `criteria`.
    pub fn distinct<C: Into<Criteria>>(&self, field: &str, criteria: C) -> UopResult<Vec<Value>> {
        let field = self.inner.translator.native_field(field);
        let filter = self.native_filter(&criteria.into());
        let values = self.inner.collection.distinct(&field, &filter)?;
        Ok(self.inner.translator.denormalize_id_from_storage(values))
    }

    /// Loads the documents with the given identifiers.
    pub fn bulk_load<T: Into<Value>>(&self, ids: Vec<T>) -> UopResult<Vec<Document>> {
        let criteria = Criteria::is_in(LOGICAL_ID, ids);
        Ok(self.find(criteria, FindOptions::new())?.into_documents())
    }

    /// Creates an index over the `(field, ascending)` pairs unless the
    /// collection already has one with exactly these keys and directions.
    ///
    /// Returns whether an index was created.
    pub fn ensure_index(&self, spec: &[(&str, bool)]) -> UopResult<bool> {
        let keys: Vec<(String, SortOrder)> = spec
            .iter()
            .map(|(field, ascending)| {
                (
                    self.inner.translator.native_field(field),
                    SortOrder::from_ascending(*ascending),
                )
            })
            .collect();

        let existing = self.inner.collection.index_information()?;
        if existing.iter().any(|index| index.keys == keys) {
            return Ok(false);
        }

        let name = self.inner.collection.create_index(&keys)?;
        log::debug!("Ensured index {} on {}", name, self.name());
        Ok(true)
    }

    fn with_tenant(&self, doc: Document) -> Document {
        match &self.inner.tenant_modifier {
            Some(modifier) => modifier.apply(doc),
            None => doc,
        }
    }

    fn native_filter(&self, criteria: &Criteria) -> Document {
        let filter = self.with_tenant(self.inner.translator.to_native(criteria));
        log::debug!("Native filter for {}: {}", self.name(), filter);
        filter
    }

    fn native_update(&self, modifications: Document, partial: bool) -> UopResult<Document> {
        let modifications = self.inner.translator.normalize_id_for_storage(modifications);
        if !partial {
            return Ok(modifications);
        }

        let mut update = Document::new();
        update.put(OP_SET, modifications)?;
        Ok(update)
    }

    fn unindex(&self, criteria: &Criteria) {
        if let Some(cache) = &self.inner.index_cache {
            cache.unindex(criteria);
        }
    }
}
