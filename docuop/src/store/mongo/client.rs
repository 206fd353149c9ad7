use crate::errors::{ErrorKind, UopError, UopResult};
use crate::store::mongo::MongoDatabase;
use crate::store::{NativeDatabase, StoreClientProvider};
use mongodb::sync::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A connected client of the MongoDB driver.
#[derive(Clone)]
pub struct MongoClient {
    inner: Arc<MongoClientInner>,
}

struct MongoClientInner {
    client: Client,
    address: String,
    closed: AtomicBool,
}

impl MongoClient {
    pub(crate) fn new(client: Client, address: String) -> MongoClient {
        MongoClient {
            inner: Arc::new(MongoClientInner {
                client,
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

impl StoreClientProvider for MongoClient {
    fn list_database_names(&self) -> UopResult<Vec<String>> {
        self.check_opened()?;
        Ok(self.inner.client.list_database_names().run()?)
    }

    fn database(&self, name: &str) -> UopResult<NativeDatabase> {
        self.check_opened()?;
        Ok(NativeDatabase::new(MongoDatabase::new(
            self.inner.client.database(name),
        )))
    }

    fn drop_database(&self, name: &str) -> UopResult<()> {
        self.check_opened()?;
        self.inner.client.database(name).drop().run()?;
        log::debug!("Dropped database {} on {}", name, self.inner.address);
        Ok(())
    }

    fn close(&self) -> UopResult<()> {
        // the connection pool is released with the last clone of the client
        self.inner.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}
