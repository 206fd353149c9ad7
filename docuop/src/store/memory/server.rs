use crate::errors::{ErrorKind, UopError, UopResult};
use crate::store::memory::InMemoryDatabase;
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use dashmap::DashMap;
use rand::rngs::OsRng;
use std::sync::Arc;

/// The process-local "server" every in-memory client of one module talks to.
///
/// Databases and users outlive the clients, so a database created through
/// one connection is visible to the next one.
#[derive(Clone, Default)]
pub(crate) struct InMemoryServer {
    inner: Arc<InMemoryServerInner>,
}

#[derive(Default)]
struct InMemoryServerInner {
    databases: DashMap<String, InMemoryDatabase>,
    users: DashMap<String, String>,
}

impl InMemoryServer {
    pub(crate) fn new() -> InMemoryServer {
        InMemoryServer::default()
    }

    pub(crate) fn database(&self, name: &str) -> UopResult<InMemoryDatabase> {
        validate_database_name(name)?;
        let database = self
            .inner
            .databases
            .entry(name.to_string())
            .or_insert_with(|| InMemoryDatabase::new(name))
            .clone();
        Ok(database)
    }

    /// Names of the databases holding at least one collection.
    pub(crate) fn database_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .databases
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    pub(crate) fn drop_database(&self, name: &str) {
        if let Some((_, database)) = self.inner.databases.remove(name) {
            database.clear();
            log::debug!("Dropped database {}", name);
        }
    }

    pub(crate) fn requires_authentication(&self) -> bool {
        !self.inner.users.is_empty()
    }

    pub(crate) fn add_user(&self, username: &str, password: &str) -> UopResult<()> {
        if username.is_empty() || password.is_empty() {
            log::error!("Username and password cannot be empty");
            return Err(UopError::new(
                "Username and password cannot be empty",
                ErrorKind::SecurityError,
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        match Argon2::default().hash_password(password.as_bytes(), &salt) {
            Ok(hash) => {
                self.inner.users.insert(username.to_string(), hash.to_string());
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to create user: {:?}", e);
                Err(UopError::new("Failed to create user", ErrorKind::SecurityError))
            }
        }
    }

    pub(crate) fn authenticate(&self, username: &str, password: &str) -> UopResult<()> {
        let expected_hash = match self.inner.users.get(username) {
            Some(entry) => entry.value().clone(),
            None => return Err(invalid_credentials()),
        };

        let parsed_hash = PasswordHash::new(&expected_hash).map_err(|e| {
            log::error!("Stored credential of {} is corrupt: {:?}", username, e);
            invalid_credentials()
        })?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| invalid_credentials())
    }
}

fn invalid_credentials() -> UopError {
    log::error!("Username or password is invalid");
    UopError::new("Username or password is invalid", ErrorKind::SecurityError)
}

fn validate_database_name(name: &str) -> UopResult<()> {
    const FORBIDDEN: &[char] = &['/', '\\', '.', ' ', '"', '$', '\0'];
    if name.is_empty() || name.contains(FORBIDDEN) {
        log::error!("Invalid database name '{}'", name);
        return Err(UopError::new(
            &format!("Invalid database name '{}'", name),
            ErrorKind::InvalidConfiguration,
        ));
    }
    Ok(())
}
