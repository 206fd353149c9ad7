use crate::database::{Database, DatabaseConfig};
use crate::errors::{ErrorKind, UopError, UopResult};
use crate::store::StoreModule;
use std::sync::Arc;

/// Fluent builder for a [DatabaseConfig].
///
/// The first invalid setting is remembered and returned by [DatabaseBuilder::open]
/// (or whichever finishing call is used); later settings are ignored.
///
/// ```rust,ignore
/// let db = Database::builder()
///     .host("localhost")
///     .port(27017)
///     .database_name("inventory")
///     .open()?;
/// ```
pub struct DatabaseBuilder {
    error: Option<UopError>,
    config: DatabaseConfig,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        DatabaseBuilder {
            error: None,
            config: DatabaseConfig::new(""),
        }
    }

    pub fn host(mut self, host: &str) -> Self {
        if self.error.is_none() {
            if host.trim().is_empty() {
                self.error = Some(invalid("Store host cannot be empty"));
            } else {
                self.config.connection_mut().host = host.to_string();
            }
        }
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        if self.error.is_none() {
            if port == 0 {
                self.error = Some(invalid("Store port cannot be 0"));
            } else {
                self.config.connection_mut().port = port;
            }
        }
        self
    }

    pub fn username(mut self, username: &str) -> Self {
        self.config.connection_mut().username = Some(username.to_string()).filter(|u| !u.is_empty());
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.config.connection_mut().password = Some(password.to_string()).filter(|p| !p.is_empty());
        self
    }

    pub fn database_name(mut self, name: &str) -> Self {
        if self.error.is_none() {
            if name.is_empty() {
                self.error = Some(invalid("Database name cannot be empty"));
            } else {
                self.config.set_database_name(name);
            }
        }
        self
    }

    /// Size of the local index kept by indexed collections.
    pub fn index_cache_size(mut self, size: usize) -> Self {
        if self.error.is_none() {
            if size == 0 {
                self.error = Some(invalid("Index cache size must be positive"));
            } else {
                self.config.set_index_cache_size(size);
            }
        }
        self
    }

    /// Uses `module` as the store driver instead of a fresh in-memory store.
    pub fn store_module<T: StoreModule + 'static>(mut self, module: T) -> Self {
        self.config.set_store_module(Arc::new(module));
        self
    }

    /// Finishes the configuration without connecting.
    pub fn config(self) -> UopResult<DatabaseConfig> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.config),
        }
    }

    /// Connects and opens the configured database.
    pub fn open(self) -> UopResult<Database> {
        let config = self.config()?;
        if config.database_name().is_empty() {
            log::error!("No database name configured");
            return Err(UopError::new(
                "No database name configured",
                ErrorKind::InvalidConfiguration,
            ));
        }
        Database::open(config)
    }

    /// Connects and opens a database with a random `testdb<N>` name.
    pub fn open_test_database(self) -> UopResult<Database> {
        Database::make_test_database(&self.config()?)
    }
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        DatabaseBuilder::new()
    }
}

fn invalid(message: &str) -> UopError {
    log::error!("{}", message);
    UopError::new(message, ErrorKind::InvalidConfiguration)
}
