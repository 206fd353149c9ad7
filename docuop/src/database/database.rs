use crate::collection::{TenantModifier, TenantScopedCollection};
use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor, MAX_TEST_DB_SUFFIX, TEST_DB_PREFIX};
use crate::database::{CollectionRegistry, DatabaseBuilder, DatabaseConfig, Session};
use crate::errors::{ErrorKind, UopError, UopResult};
use crate::store::{NativeCollection, NativeDatabase, StoreClient, TransactionCapability};
use parking_lot::Mutex;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An open database on a document store.
///
/// `Database` owns the store client it was opened with and a registry of the
/// raw collections it has resolved so far. Clones share both, so a
/// collection resolved through one clone is reused by every other.
///
/// Once [Database::close] has been called every operation on any clone
/// returns a `DatabaseClosed` error.
///
/// # Examples
///
/// ```rust,ignore
/// use docuop::database::Database;
/// use docuop::collection::TenantModifier;
///
/// let db = Database::builder().database_name("inventory").open()?;
/// let parts = db.managed_collection("parts", Some(TenantModifier::scoped_to("tenant", "acme")))?;
/// assert!(db.has_collection("parts")?);
/// db.close()?;
/// ```
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Connects with `config` and selects the configured database.
    ///
    /// # Errors
    ///
    /// Returns the driver's error when the client cannot be constructed,
    /// for example `SecurityError` for rejected credentials.
    pub fn open(config: DatabaseConfig) -> UopResult<Database> {
        let client = config.connect()?;
        let database = client.database(config.database_name())?;
        log::debug!(
            "Opened database {} on {}",
            config.database_name(),
            config.connection().address()
        );
        Ok(Database {
            inner: Arc::new(DatabaseInner {
                config,
                client,
                database: atomic(database),
                registry: CollectionRegistry::new(),
                closed: AtomicBool::new(false),
                session: Mutex::new(None),
            }),
        })
    }

    /// Opens the database `name` on the store described by `config`.
    pub fn make_named_database(name: &str, config: &DatabaseConfig) -> UopResult<Database> {
        Database::open(config.with_database_name(name))
    }

    /// Opens a database with a random `testdb<N>` name, `N` in `1..=10000`.
    pub fn make_test_database(config: &DatabaseConfig) -> UopResult<Database> {
        let suffix = rand::thread_rng().gen_range(1..=MAX_TEST_DB_SUFFIX);
        let name = format!("{}{}", TEST_DB_PREFIX, suffix);
        Database::make_named_database(&name, config)
    }

    /// Names of the databases currently holding data on the store.
    pub fn existing_db_names(config: &DatabaseConfig) -> UopResult<Vec<String>> {
        let client = config.connect()?;
        let names = client.list_database_names();
        client.close()?;
        names
    }

    pub fn drop_named_database(name: &str, config: &DatabaseConfig) -> UopResult<()> {
        let client = config.connect()?;
        let dropped = client.drop_database(name);
        client.close()?;
        dropped
    }

    pub fn name(&self) -> &str {
        self.inner.config.database_name()
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.inner.config
    }

    /// Returns the named native collection, creating it when absent.
    ///
    /// The first lookup of a name is remembered; later lookups of the same
    /// name return the remembered collection without asking the store.
    pub fn raw_collection(&self, name: &str) -> UopResult<NativeCollection> {
        self.inner.check_opened()?;
        let database = self.inner.database();
        self.inner.registry.get_or_resolve(name, || {
            if database.has_collection(name)? {
                database.collection(name)
            } else {
                database.create_collection(name)
            }
        })
    }

    /// Wraps the named collection with tenant scoping and id translation.
    pub fn managed_collection(
        &self,
        name: &str,
        tenant_modifier: Option<TenantModifier>,
    ) -> UopResult<TenantScopedCollection> {
        let collection = self.raw_collection(name)?;
        Ok(TenantScopedCollection::new(collection, tenant_modifier))
    }

    /// Like [Database::managed_collection] with a local index of recently
    /// seen documents, sized by the configured index cache size.
    pub fn indexed_collection(
        &self,
        name: &str,
        tenant_modifier: Option<TenantModifier>,
    ) -> UopResult<TenantScopedCollection> {
        let collection = self.raw_collection(name)?;
        Ok(TenantScopedCollection::indexed(
            collection,
            tenant_modifier,
            self.inner.config.index_cache_size(),
        ))
    }

    pub fn has_collection(&self, name: &str) -> UopResult<bool> {
        self.inner.check_opened()?;
        self.inner.database().has_collection(name)
    }

    pub fn collection_names(&self) -> UopResult<Vec<String>> {
        self.inner.check_opened()?;
        self.inner.database().list_collection_names()
    }

    /// Drops this database on the store and forgets every resolved collection.
    ///
    /// The database stays open; collections resolved afterwards are created
    /// anew.
    pub fn drop_database(&self) -> UopResult<()> {
        self.inner.check_opened()?;
        self.inner.client.drop_database(self.name())?;
        self.inner.registry.clear();
        let reselected = self.inner.client.database(self.name())?;
        self.inner.database.write_with(|database| *database = reselected);
        log::debug!("Dropped database {}", self.name());
        Ok(())
    }

    pub fn transaction_capability(&self) -> TransactionCapability {
        self.inner.client.transaction_capability()
    }

    /// Begins a transaction, or deepens the one already in progress.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotSupported` when the store driver has no
    /// transactions.
    pub fn begin_transaction(&self) -> UopResult<Session> {
        self.inner.check_opened()?;
        if self.transaction_capability() == TransactionCapability::Unsupported {
            log::error!("Database {} cannot begin a transaction", self.name());
            return Err(UopError::new(
                "Store driver does not support transactions",
                ErrorKind::TransactionNotSupported,
            ));
        }

        let mut slot = self.inner.session.lock();
        let session = slot
            .get_or_insert_with(|| Session::new(self.inner.client.clone()))
            .clone();
        session.begin()?;
        Ok(session)
    }

    /// Commits one level of the current transaction. Without a transaction
    /// in progress this does nothing.
    pub fn commit(&self) -> UopResult<()> {
        self.inner.check_opened()?;
        let mut slot = self.inner.session.lock();
        let finished = match slot.as_ref() {
            Some(session) => {
                session.commit()?;
                !session.is_active()
            }
            None => false,
        };
        if finished {
            *slot = None;
        }
        Ok(())
    }

    /// Closes the store client. Closing twice is not an error.
    pub fn close(&self) -> UopResult<()> {
        self.inner.close()
    }

    pub fn is_open(&self) -> bool {
        !self.inner.closed.load(Ordering::SeqCst)
    }
}

struct DatabaseInner {
    config: DatabaseConfig,
    client: StoreClient,
    database: Atomic<NativeDatabase>,
    registry: CollectionRegistry,
    closed: AtomicBool,
    session: Mutex<Option<Session>>,
}

impl DatabaseInner {
    fn database(&self) -> NativeDatabase {
        self.database.read_with(|database| database.clone())
    }

    fn check_opened(&self) -> UopResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            log::error!("Database {} is closed", self.config.database_name());
            return Err(UopError::new("Database is closed", ErrorKind::DatabaseClosed));
        }
        Ok(())
    }

    fn close(&self) -> UopResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        if let Some(session) = self.session.lock().take() {
            if session.is_active() {
                log::warn!("Aborting unfinished transaction on close");
                session.abort()?;
            }
        }
        self.registry.clear();
        self.client.close()?;
        log::debug!("Closed database {}", self.config.database_name());
        Ok(())
    }
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            log::error!("Failed to close database: {}", err);
        }
    }
}
