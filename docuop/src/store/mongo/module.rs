use crate::errors::UopResult;
use crate::store::mongo::MongoClient;
use crate::store::{ConnectionConfig, StoreClient, StoreModule};
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, Credential, ServerAddress};
use mongodb::sync::Client;
use std::time::Duration;

const DEFAULT_SELECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Store driver for a MongoDB server.
///
/// `connect` pings the server, so unreachable hosts and rejected
/// credentials fail at open time rather than on the first query.
#[derive(Debug, Clone)]
pub struct MongoStoreModule {
    app_name: Option<String>,
    server_selection_timeout: Duration,
}

impl MongoStoreModule {
    pub fn new() -> MongoStoreModule {
        MongoStoreModule {
            app_name: None,
            server_selection_timeout: DEFAULT_SELECTION_TIMEOUT,
        }
    }

    /// Name reported to the server in its connection logs.
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// How long to wait for a reachable server before giving up.
    pub fn server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = timeout;
        self
    }

    fn client_options(&self, config: &ConnectionConfig) -> UopResult<ClientOptions> {
        let mut options = ClientOptions::default();
        options.hosts = vec![ServerAddress::parse(config.address())?];
        options.app_name = self.app_name.clone();
        options.server_selection_timeout = Some(self.server_selection_timeout);

        if let Some((username, password)) = config.credentials() {
            let mut credential = Credential::default();
            credential.username = Some(username.to_string());
            credential.password = Some(password.to_string());
            options.credential = Some(credential);
        }
        Ok(options)
    }
}

impl Default for MongoStoreModule {
    fn default() -> Self {
        MongoStoreModule::new()
    }
}

impl StoreModule for MongoStoreModule {
    fn connect(&self, config: &ConnectionConfig) -> UopResult<StoreClient> {
        config.validate()?;

        let options = self.client_options(config)?;
        let client = Client::with_options(options).map_err(|e| {
            log::error!("Failed to create client for {}: {}", config.address(), e);
            e
        })?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .run()
            .map_err(|e| {
                log::error!("Failed to reach store at {}: {}", config.address(), e);
                e
            })?;

        log::debug!("Connected to MongoDB at {}", config.address());
        Ok(StoreClient::new(MongoClient::new(client, config.address())))
    }
}
