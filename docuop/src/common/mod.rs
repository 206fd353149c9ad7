//! Common types shared by every layer of the adaptor.
//!
//! - [`Value`] and [`Document`] model the schemaless data exchanged with the store
//! - [`ObjectId`] is the identifier a driver assigns to documents inserted without one
//! - [`SortOrder`] is the direction of a sort key or index key
//! - constants name the logical and native identifier fields

mod constants;
mod document;
mod object_id;
mod snowflake;
mod sort_order;
mod type_utils;
mod value;

pub use constants::*;
pub use document::*;
pub use object_id::*;
pub(crate) use snowflake::*;
pub use sort_order::*;
pub use type_utils::*;
pub use value::*;
