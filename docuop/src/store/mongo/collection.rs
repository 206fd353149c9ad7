use crate::common::{Document, ObjectId, SortOrder, Value, NATIVE_ID};
use crate::errors::{UopError, UopResult};
use crate::store::mongo::convert::{
    from_bson, from_bson_document, keys_document, keys_from_document, to_bson_document,
};
use crate::store::{IndexModel, NativeCollectionProvider, NativeFindOptions, UpdateResult};
use mongodb::bson::{Bson, Document as BsonDocument};
use mongodb::sync::Collection;
use mongodb::IndexModel as MongoIndexModel;

/// One collection on a MongoDB server.
#[derive(Clone)]
pub struct MongoCollection {
    collection: Collection<BsonDocument>,
}

impl MongoCollection {
    pub(crate) fn new(collection: Collection<BsonDocument>) -> MongoCollection {
        MongoCollection { collection }
    }
}

fn projection_document(fields: &[String]) -> BsonDocument {
    let mut projection = BsonDocument::new();
    for field in fields {
        projection.insert(field.clone(), Bson::Int32(1));
    }
    projection
}

impl NativeCollectionProvider for MongoCollection {
    fn name(&self) -> String {
        self.collection.name().to_string()
    }

    fn insert_one(&self, mut document: Document) -> UopResult<Value> {
        // ids are assigned here so they read back as ObjectId values
        if document.get(NATIVE_ID).map_or(true, Value::is_null) {
            document.put(NATIVE_ID, ObjectId::new())?;
        }

        let result = self.collection.insert_one(to_bson_document(&document)).run()?;
        Ok(from_bson(result.inserted_id))
    }

    fn find(&self, filter: &Document, options: &NativeFindOptions) -> UopResult<Vec<Document>> {
        let mut find = self.collection.find(to_bson_document(filter));
        if !options.sort.is_empty() {
            find = find.sort(keys_document(&options.sort));
        }
        if let Some(limit) = options.limit {
            find = find.limit(limit as i64);
        }
        if let Some(fields) = &options.projection {
            find = find.projection(projection_document(fields));
        }

        find.run()?
            .map(|doc| doc.map(from_bson_document).map_err(UopError::from))
            .collect()
    }

    fn find_one(&self, filter: &Document) -> UopResult<Option<Document>> {
        let found = self.collection.find_one(to_bson_document(filter)).run()?;
        Ok(found.map(from_bson_document))
    }

    fn update_many(&self, filter: &Document, update: &Document) -> UopResult<UpdateResult> {
        let result = self
            .collection
            .update_many(to_bson_document(filter), to_bson_document(update))
            .run()?;
        Ok(UpdateResult {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    fn update_one(&self, filter: &Document, update: &Document) -> UopResult<UpdateResult> {
        let result = self
            .collection
            .update_one(to_bson_document(filter), to_bson_document(update))
            .run()?;
        Ok(UpdateResult {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    fn delete_many(&self, filter: &Document) -> UopResult<u64> {
        let result = self.collection.delete_many(to_bson_document(filter)).run()?;
        Ok(result.deleted_count)
    }

    fn count_documents(&self, filter: &Document) -> UopResult<u64> {
        Ok(self.collection.count_documents(to_bson_document(filter)).run()?)
    }

    fn distinct(&self, field: &str, filter: &Document) -> UopResult<Vec<Value>> {
        let values = self
            .collection
            .distinct(field, to_bson_document(filter))
            .run()?;
        Ok(values.into_iter().map(from_bson).collect())
    }

    fn index_information(&self) -> UopResult<Vec<IndexModel>> {
        self.collection
            .list_indexes()
            .run()?
            .map(|index| -> UopResult<IndexModel> {
                let index = index?;
                let keys = keys_from_document(&index.keys);
                let name = index.options.and_then(|options| options.name);
                Ok(match name {
                    Some(name) => IndexModel { name, keys },
                    None => IndexModel::from_keys(keys),
                })
            })
            .collect()
    }

    fn create_index(&self, keys: &[(String, SortOrder)]) -> UopResult<String> {
        let model = MongoIndexModel::builder().keys(keys_document(keys)).build();
        let result = self.collection.create_index(model).run()?;
        log::debug!("Created index {} on {}", result.index_name, self.collection.name());
        Ok(result.index_name)
    }
}
