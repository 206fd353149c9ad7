use crate::errors::{ErrorKind, UopError, UopResult};
use crate::store::memory::server::InMemoryServer;
use crate::store::{NativeDatabase, StoreClientProvider};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A connected client of the in-memory driver.
#[derive(Clone)]
pub struct InMemoryClient {
    inner: Arc<InMemoryClientInner>,
}

struct InMemoryClientInner {
    server: InMemoryServer,
    address: String,
    closed: AtomicBool,
}

impl InMemoryClient {
    pub(crate) fn new(server: InMemoryServer, address: String) -> InMemoryClient {
        InMemoryClient {
            inner: Arc::new(InMemoryClientInner {
                server,
                address,
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn address(&self) -> &str {
        &self.inner.address
    }

    fn check_opened(&self) -> UopResult<()> {
        if self.inner.closed.load(Ordering::Relaxed) {
            log::error!("Client for {} is closed", self.inner.address);
            return Err(UopError::new(
                &format!("Client for {} is closed", self.inner.address),
                ErrorKind::ConnectionError,
            ));
        }
        Ok(())
    }
}

impl StoreClientProvider for InMemoryClient {
    fn list_database_names(&self) -> UopResult<Vec<String>> {
        self.check_opened()?;
        Ok(self.inner.server.database_names())
    }

    fn database(&self, name: &str) -> UopResult<NativeDatabase> {
        self.check_opened()?;
        Ok(NativeDatabase::new(self.inner.server.database(name)?))
    }

    fn drop_database(&self, name: &str) -> UopResult<()> {
        self.check_opened()?;
        self.inner.server.drop_database(name);
        Ok(())
    }

    fn close(&self) -> UopResult<()> {
        self.inner.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}
