//! Database lifecycle.
//!
//! A [Database] is opened from a [DatabaseConfig], usually assembled with
//! the fluent [DatabaseBuilder]. It owns the store client, resolves raw
//! collections through a per-database registry and hands out tenant scoped
//! collections. Stores with transactions are driven through a [Session].

mod collection_registry;
#[allow(clippy::module_inception)]
mod database;
mod database_builder;
mod database_config;
mod session;

pub(crate) use collection_registry::CollectionRegistry;
pub use database::*;
pub use database_builder::*;
pub use database_config::*;
pub use session::Session;
