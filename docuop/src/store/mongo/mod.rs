//! MongoDB store driver.
//!
//! Implements the provider traits on the blocking API of the `mongodb`
//! crate. Built only with the `mongo` feature.
//!
//! Documents cross the wire as BSON. An [ObjectId](crate::common::ObjectId)
//! is written as a server object id whose first four bytes are zero, so ids
//! assigned by this driver read back unchanged. Server object ids generated
//! by other writers read back as their hex string.
//!
//! The driver reports no transaction support: operations are not bound to
//! a client session.

mod client;
mod collection;
mod convert;
mod database;
mod module;

pub use client::*;
pub use collection::*;
pub use database::*;
pub use module::*;
