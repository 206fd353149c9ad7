use crate::errors::{ErrorKind, UopError, UopResult};
use crate::store::StoreClient;
use parking_lot::Mutex;
use std::sync::Arc;

/// A transaction session on a store that supports transactions.
///
/// Nested [Session::begin] calls only deepen the session. The driver
/// transaction starts with the outermost `begin` and is committed by the
/// matching outermost [Session::commit]; inner commits only unwind.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: StoreClient,
    depth: Mutex<usize>,
}

impl Session {
    pub(crate) fn new(client: StoreClient) -> Session {
        Session {
            inner: Arc::new(SessionInner {
                client,
                depth: Mutex::new(0),
            }),
        }
    }

    pub fn begin(&self) -> UopResult<()> {
        let mut depth = self.inner.depth.lock();
        if *depth == 0 {
            self.inner.client.start_transaction()?;
        }
        *depth += 1;
        Ok(())
    }

    pub fn commit(&self) -> UopResult<()> {
        let mut depth = self.inner.depth.lock();
        match *depth {
            0 => {
                log::error!("Commit without an active transaction");
                Err(UopError::new(
                    "Commit without an active transaction",
                    ErrorKind::InvalidOperation,
                ))
            }
            1 => {
                self.inner.client.commit_transaction()?;
                *depth = 0;
                Ok(())
            }
            _ => {
                *depth -= 1;
                Ok(())
            }
        }
    }

    /// Aborts the whole transaction, however deeply nested.
    pub fn abort(&self) -> UopResult<()> {
        let mut depth = self.inner.depth.lock();
        if *depth == 0 {
            return Ok(());
        }
        *depth = 0;
        self.inner.client.abort_transaction()
    }

    pub fn depth(&self) -> usize {
        *self.inner.depth.lock()
    }

    pub fn is_active(&self) -> bool {
        self.depth() > 0
    }
}
