use crate::errors::{ErrorKind, UopError, UopResult};
use crate::store::mongo::MongoCollection;
use crate::store::{NativeCollection, NativeDatabaseProvider};
use mongodb::bson::Document as BsonDocument;
use mongodb::error::{Error, ErrorKind as MongoErrorKind};
use mongodb::sync::Database;

// NamespaceExists
const NAMESPACE_EXISTS: i32 = 48;

fn namespace_exists(err: &Error) -> bool {
    matches!(err.kind.as_ref(), MongoErrorKind::Command(e) if e.code == NAMESPACE_EXISTS)
}

/// One database on a MongoDB server.
#[derive(Clone)]
pub struct MongoDatabase {
    database: Database,
}

impl MongoDatabase {
    pub(crate) fn new(database: Database) -> MongoDatabase {
        MongoDatabase { database }
    }

    fn handle(&self, name: &str) -> NativeCollection {
        NativeCollection::new(MongoCollection::new(
            self.database.collection::<BsonDocument>(name),
        ))
    }
}

impl NativeDatabaseProvider for MongoDatabase {
    fn name(&self) -> String {
        self.database.name().to_string()
    }

    fn list_collection_names(&self) -> UopResult<Vec<String>> {
        Ok(self.database.list_collection_names().run()?)
    }

    fn create_collection(&self, name: &str) -> UopResult<NativeCollection> {
        match self.database.create_collection(name).run() {
            Ok(()) => log::debug!("Created collection {} in {}", name, self.database.name()),
            Err(e) if namespace_exists(&e) => {}
            Err(e) => {
                log::error!("Failed to create collection {}: {}", name, e);
                return Err(e.into());
            }
        }
        Ok(self.handle(name))
    }

    fn collection(&self, name: &str) -> UopResult<NativeCollection> {
        if self.list_collection_names()?.iter().any(|n| n == name) {
            return Ok(self.handle(name));
        }
        log::error!("Collection {} not found in {}", name, self.database.name());
        Err(UopError::new(
            &format!("Collection {} not found", name),
            ErrorKind::CollectionNotFound,
        ))
    }
}
