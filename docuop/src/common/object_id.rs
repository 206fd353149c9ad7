use crate::errors::{ErrorKind, UopError, UopResult};
use crate::ID_GENERATOR;
use std::fmt::{Debug, Display};

/// Identifier assigned by a store driver to a document inserted without `_id`.
///
/// Ids come from a snowflake generator, so they are unique per process and
/// roughly ordered by creation time. The textual form is 16 lowercase hex
/// digits.
///
/// # Examples
///
/// ```rust,ignore
/// use docuop::common::ObjectId;
///
/// let id = ObjectId::new();
/// let parsed = ObjectId::parse(&id.to_hex())?;
/// assert_eq!(id, parsed);
/// ```
#[derive(PartialEq, Eq, Ord, PartialOrd, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ObjectId {
    id_value: u64,
}

impl ObjectId {
    /// Generates a new unique `ObjectId`.
    pub fn new() -> Self {
        ObjectId {
            id_value: ID_GENERATOR.next_id(),
        }
    }

    /// Parses the 16 digit hex form produced by [ObjectId::to_hex].
    pub fn parse(hex: &str) -> UopResult<ObjectId> {
        if hex.len() != 16 {
            log::error!("Object id {} must be 16 hex digits", hex);
            return Err(UopError::new(
                &format!("Object id {} must be 16 hex digits", hex),
                ErrorKind::InvalidId,
            ));
        }

        u64::from_str_radix(hex, 16)
            .map(|id_value| ObjectId { id_value })
            .map_err(|e| {
                log::error!("Invalid object id {}: {}", hex, e);
                UopError::new(&format!("Invalid object id {}: {}", hex, e), ErrorKind::InvalidId)
            })
    }

    /// Rebuilds an id from its numeric value, as stored by a driver.
    pub fn from_id_value(id_value: u64) -> ObjectId {
        ObjectId { id_value }
    }

    pub fn id_value(&self) -> u64 {
        self.id_value
    }

    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.id_value)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Debug for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId(\"{}\")", self.to_hex())
    }
}
