//! Store driver abstractions.
//!
//! The adaptor talks to the document store through three provider traits,
//! one per level of the store's hierarchy:
//!
//! - [`StoreClientProvider`]: a connected client listing, selecting and dropping databases
//! - [`NativeDatabaseProvider`]: one named database and its collections
//! - [`NativeCollectionProvider`]: one physical collection taking native filters
//!
//! Each trait has a cheap-to-clone handle ([`StoreClient`], [`NativeDatabase`],
//! [`NativeCollection`]) that dereferences to the provider. A [`StoreModule`]
//! turns a [`ConnectionConfig`] into a connected client.
//!
//! # Drivers
//!
//! - **In-Memory**: [`memory::InMemoryStoreModule`], an in-process document engine
//! - **MongoDB**: `mongo::MongoStoreModule`, with the `mongo` feature

pub mod memory;
#[cfg(feature = "mongo")]
pub mod mongo;
mod native_collection;
mod native_database;
mod store_client;
mod store_module;

pub use native_collection::*;
pub use native_database::*;
pub use store_client::*;
pub use store_module::*;
