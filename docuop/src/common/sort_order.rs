/// Direction of a sort key or of one key of a compound index.
///
/// Ascending maps to `1` and descending to `-1` in the native index
/// representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Smallest to largest
    Ascending,
    /// Largest to smallest
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> SortOrder {
        if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, SortOrder::Ascending)
    }

    /// The numeric direction used in native index keys.
    pub fn direction(&self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}
