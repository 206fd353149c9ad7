use crate::common::DEFAULT_INDEX_CACHE_SIZE;
use crate::store::memory::InMemoryStoreModule;
use crate::store::{ConnectionConfig, StoreClient, StoreModule};
use crate::errors::UopResult;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Everything needed to open a [Database](crate::database::Database).
///
/// Cloning is cheap; clones share the store module, so databases opened from
/// clones of one config live on the same store.
#[derive(Clone)]
pub struct DatabaseConfig {
    connection: ConnectionConfig,
    database_name: String,
    index_cache_size: usize,
    store_module: Arc<dyn StoreModule>,
}

impl DatabaseConfig {
    pub fn new(database_name: &str) -> DatabaseConfig {
        DatabaseConfig {
            connection: ConnectionConfig::default(),
            database_name: database_name.to_string(),
            index_cache_size: DEFAULT_INDEX_CACHE_SIZE,
            store_module: Arc::new(InMemoryStoreModule::new()),
        }
    }

    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn index_cache_size(&self) -> usize {
        self.index_cache_size
    }

    /// The same config pointing at another database of the same store.
    pub fn with_database_name(&self, database_name: &str) -> DatabaseConfig {
        let mut config = self.clone();
        config.database_name = database_name.to_string();
        config
    }

    pub(crate) fn connection_mut(&mut self) -> &mut ConnectionConfig {
        &mut self.connection
    }

    pub(crate) fn set_database_name(&mut self, database_name: &str) {
        self.database_name = database_name.to_string();
    }

    pub(crate) fn set_index_cache_size(&mut self, size: usize) {
        self.index_cache_size = size;
    }

    pub(crate) fn set_store_module(&mut self, store_module: Arc<dyn StoreModule>) {
        self.store_module = store_module;
    }

    /// Connects a new client to the configured store.
    pub(crate) fn connect(&self) -> UopResult<StoreClient> {
        self.store_module.connect(&self.connection)
    }
}

impl Debug for DatabaseConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("address", &self.connection.address())
            .field("database_name", &self.database_name)
            .field("index_cache_size", &self.index_cache_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DatabaseConfig::new("db");
        assert_eq!(config.database_name(), "db");
        assert_eq!(config.connection().address(), "localhost:27017");
        assert_eq!(config.index_cache_size(), DEFAULT_INDEX_CACHE_SIZE);
    }

    #[test]
    fn with_database_name_shares_store() {
        let config = DatabaseConfig::new("a");
        let client = config.connect().unwrap();
        client.database("a").unwrap().create_collection("items").unwrap();

        let other = config.with_database_name("b");
        assert_eq!(other.database_name(), "b");
        let names = other.connect().unwrap().list_database_names().unwrap();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn debug_hides_credentials() {
        let mut config = DatabaseConfig::new("db");
        config.connection_mut().password = Some("secret".to_string());
        assert!(!format!("{:?}", config).contains("secret"));
    }
}
