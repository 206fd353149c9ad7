use crate::errors::{ErrorKind, UopError, UopResult};
use crate::store::memory::server::InMemoryServer;
use crate::store::memory::InMemoryClient;
use crate::store::{ConnectionConfig, StoreClient, StoreModule};

/// Store driver keeping every database in process memory.
///
/// Clones of a module share one server, so clients connected through any
/// clone see the same databases.
#[derive(Clone, Default)]
pub struct InMemoryStoreModule {
    server: InMemoryServer,
}

impl InMemoryStoreModule {
    pub fn new() -> InMemoryStoreModule {
        InMemoryStoreModule {
            server: InMemoryServer::new(),
        }
    }

    pub fn with_config() -> InMemoryStoreModuleBuilder {
        InMemoryStoreModuleBuilder::new()
    }

    /// Registers a user. Once a user exists, every connection must
    /// authenticate.
    pub fn add_user(&self, username: &str, password: &str) -> UopResult<()> {
        self.server.add_user(username, password)
    }
}

impl StoreModule for InMemoryStoreModule {
    fn connect(&self, config: &ConnectionConfig) -> UopResult<StoreClient> {
        config.validate()?;

        match (config.credentials(), self.server.requires_authentication()) {
            (Some((username, password)), true) => self.server.authenticate(username, password)?,
            (Some((username, _)), false) => {
                log::error!("Authentication failed for {}: no such user", username);
                return Err(UopError::new(
                    "Username or password is invalid",
                    ErrorKind::SecurityError,
                ));
            }
            (None, true) => {
                log::error!("Server at {} requires authentication", config.address());
                return Err(UopError::new(
                    "Authentication required",
                    ErrorKind::SecurityError,
                ));
            }
            (None, false) => {}
        }

        log::debug!("Connected to in-memory store at {}", config.address());
        Ok(StoreClient::new(InMemoryClient::new(
            self.server.clone(),
            config.address(),
        )))
    }
}

#[derive(Default)]
pub struct InMemoryStoreModuleBuilder {
    users: Vec<(String, String)>,
}

impl InMemoryStoreModuleBuilder {
    pub fn new() -> InMemoryStoreModuleBuilder {
        InMemoryStoreModuleBuilder { users: Vec::new() }
    }

    pub fn user(mut self, username: &str, password: &str) -> Self {
        self.users.push((username.to_string(), password.to_string()));
        self
    }

    pub fn build(self) -> UopResult<InMemoryStoreModule> {
        let module = InMemoryStoreModule::new();
        for (username, password) in self.users {
            module.add_user(&username, &password)?;
        }
        Ok(module)
    }
}
