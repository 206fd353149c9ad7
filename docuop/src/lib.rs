//! # docuop - Document Store Persistence Adaptor
//!
//! docuop sits between application code that speaks in logical criteria and
//! a document store that speaks native filters. It translates queries,
//! renames identifiers between the logical `id` and the native `_id`,
//! scopes every query and insert to a tenant, and manages the lifecycle of
//! named databases on a store server.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docuop::database::Database;
//! use docuop::collection::{FindOptions, TenantModifier};
//! use docuop::doc;
//!
//! let db = Database::builder()
//!     .database_name("inventory")
//!     .open()?;
//!
//! let items = db.managed_collection("items", Some(TenantModifier::scoped_to("tenant", "acme")))?;
//! items.insert(doc! { id: 1, name: "bolt", size: 3 })?;
//!
//! let large = items.find(doc! { gt: { size: 2 } }, FindOptions::default())?;
//! db.close()?;
//! ```
//!
//! ## Design Pattern
//!
//! Handles such as [Database](database::Database) and
//! [TenantScopedCollection](collection::TenantScopedCollection) are cheap to
//! clone. Every clone shares the same underlying state through an `Arc`.
//! Store drivers plug in behind the provider traits of the [store] module;
//! [InMemoryStoreModule](store::memory::InMemoryStoreModule) is the bundled
//! driver.
//!
//! ## Module Organization
//!
//! - [`common`] - Values, documents, identifiers and shared constants
//! - [`errors`] - Error types and result definitions
//! - [`criteria`] - Logical criteria and their translation to native filters
//! - [`collection`] - Tenant scoped collections
//! - [`store`] - Store driver abstractions and the in-memory driver
//! - [`database`] - Database lifecycle, registry and transactions

use crate::common::SnowflakeIdGenerator;
use std::sync::LazyLock;

pub mod collection;
pub mod common;
pub mod criteria;
pub mod database;
pub mod errors;
pub mod store;

pub(crate) static ID_GENERATOR: LazyLock<SnowflakeIdGenerator> =
    LazyLock::new(SnowflakeIdGenerator::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[ctor::ctor]
    fn init() {
        colog::init();
    }

    #[test]
    fn logging_is_initialised() {
        assert!(log::max_level() >= log::LevelFilter::Error);
        log::debug!("unit test logging ready");
    }

    #[test]
    fn id_generator_is_shared() {
        let first = ID_GENERATOR.next_id();
        let second = ID_GENERATOR.next_id();
        assert!(second > first);
        assert_eq!(ID_GENERATOR.node_id(), ID_GENERATOR.node_id());
    }
}
