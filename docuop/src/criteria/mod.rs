//! Logical query criteria and their translation into native filters.
//!
//! Callers describe filters with [Criteria], either through its constructors
//! or by converting a mapping-shaped [Document](crate::common::Document). The
//! [CriteriaTranslator] rewrites criteria and documents between the logical
//! identifier `id` and the native identifier `_id`.

#[allow(clippy::module_inception)]
mod criteria;
mod translator;

pub use criteria::*;
pub use translator::*;
