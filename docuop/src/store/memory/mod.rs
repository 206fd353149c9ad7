//! In-memory store driver.
//!
//! A process-local document engine implementing the store provider traits.
//! It evaluates native filters and updates itself, keeps documents in
//! insertion order and reports index metadata like a document server would.
//! It has no transaction primitive.

mod client;
mod collection;
mod database;
mod filter;
mod module;
mod server;
mod update;

pub use client::*;
pub use collection::*;
pub use database::*;
pub use module::*;
