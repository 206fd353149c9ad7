//! Tenant scoped collections.
//!
//! A [TenantScopedCollection] wraps one physical collection of the store. It
//! speaks logical criteria and logical identifiers to callers and native
//! filters to the store, and applies an optional [TenantModifier] to every
//! filter and inserted document.

mod find_options;
mod index_cache;
mod tenant;
mod tenant_scoped_collection;

pub use find_options::*;
pub(crate) use index_cache::LocalIndexCache;
pub use tenant::*;
pub use tenant_scoped_collection::*;
