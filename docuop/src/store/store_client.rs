use crate::errors::{ErrorKind, UopError, UopResult};
use crate::store::NativeDatabase;
use std::ops::Deref;
use std::sync::Arc;

/// Whether a store driver offers multi-document transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionCapability {
    Unsupported,
    Supported,
}

/// Driver side of a connected store client.
///
/// The transaction methods default to reporting `TransactionNotSupported`;
/// drivers returning [TransactionCapability::Supported] override them.
pub trait StoreClientProvider: Send + Sync {
    fn list_database_names(&self) -> UopResult<Vec<String>>;

    /// Selects a database, creating it lazily on the server side.
    fn database(&self, name: &str) -> UopResult<NativeDatabase>;

    /// Drops a database. Dropping a missing database is not an error.
    fn drop_database(&self, name: &str) -> UopResult<()>;

    fn transaction_capability(&self) -> TransactionCapability {
        TransactionCapability::Unsupported
    }

    fn start_transaction(&self) -> UopResult<()> {
        Err(transaction_not_supported())
    }

    fn commit_transaction(&self) -> UopResult<()> {
        Err(transaction_not_supported())
    }

    fn abort_transaction(&self) -> UopResult<()> {
        Err(transaction_not_supported())
    }

    /// Releases the client. Further calls may fail.
    fn close(&self) -> UopResult<()> {
        Ok(())
    }
}

fn transaction_not_supported() -> UopError {
    log::error!("Store driver does not support transactions");
    UopError::new(
        "Store driver does not support transactions",
        ErrorKind::TransactionNotSupported,
    )
}

/// Handle to a connected store client.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<dyn StoreClientProvider>,
}

impl StoreClient {
    pub fn new<T: StoreClientProvider + 'static>(inner: T) -> Self {
        StoreClient {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for StoreClient {
    type Target = Arc<dyn StoreClientProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
