// identifier constants
pub const LOGICAL_ID: &str = "id";
pub const NATIVE_ID: &str = "_id";
pub const NATIVE_ID_INDEX: &str = "_id_";

// connection constants
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 27017;
pub const TEST_DB_PREFIX: &str = "testdb";
pub const MAX_TEST_DB_SUFFIX: u32 = 10000;

// native operator constants
pub const OP_GT: &str = "$gt";
pub const OP_GTE: &str = "$gte";
pub const OP_LT: &str = "$lt";
pub const OP_LTE: &str = "$lte";
pub const OP_EQ: &str = "$eq";
pub const OP_NE: &str = "$ne";
pub const OP_IN: &str = "$in";
pub const OP_NIN: &str = "$nin";
pub const OP_REGEX: &str = "$regex";
pub const OP_EXISTS: &str = "$exists";
pub const OP_AND: &str = "$and";
pub const OP_OR: &str = "$or";
pub const OP_SET: &str = "$set";
pub const OP_UNSET: &str = "$unset";
pub const OP_INC: &str = "$inc";

pub const FIELD_SEPARATOR: char = '.';

// local index cache
pub const DEFAULT_INDEX_CACHE_SIZE: usize = 1024;
