use crate::common::{DEFAULT_HOST, DEFAULT_PORT};
use crate::errors::{ErrorKind, UopError, UopResult};
use crate::store::StoreClient;

/// Where and how to reach the store server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ConnectionConfig {
    pub fn new(host: &str, port: u16) -> ConnectionConfig {
        ConnectionConfig {
            host: host.to_string(),
            port,
            username: None,
            password: None,
        }
    }

    /// The credentials to authenticate with.
    ///
    /// Credentials are only used when both the username and the password are
    /// present; a lone username or password is ignored.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }

    /// Checks the address part of the configuration.
    pub fn validate(&self) -> UopResult<()> {
        if self.host.trim().is_empty() {
            log::error!("Store host cannot be empty");
            return Err(UopError::new(
                "Store host cannot be empty",
                ErrorKind::InvalidConfiguration,
            ));
        }
        if self.port == 0 {
            log::error!("Store port cannot be 0");
            return Err(UopError::new(
                "Store port cannot be 0",
                ErrorKind::InvalidConfiguration,
            ));
        }
        Ok(())
    }

    /// `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

/// A store driver: builds connected clients from a [ConnectionConfig].
pub trait StoreModule: Send + Sync {
    fn connect(&self, config: &ConnectionConfig) -> UopResult<StoreClient>;
}
