use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for adaptor and driver operations.
///
/// Every failure surfaced by this crate carries one of these kinds so callers
/// can tell a configuration problem from a store failure without parsing
/// messages.
///
/// # Examples
///
/// ```rust,ignore
/// use docuop::errors::{UopError, ErrorKind, UopResult};
///
/// fn example() -> UopResult<()> {
///     Err(UopError::new("Collection not found", ErrorKind::CollectionNotFound))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Bootstrap Errors - raised while constructing the store client
    /// The store could not be reached with the given host and port
    ConnectionError,
    /// Credentials were rejected or incomplete
    SecurityError,
    /// The connection or database configuration is malformed
    InvalidConfiguration,
    /// The database session has been closed
    DatabaseClosed,

    // Native Store Errors - raised by a driver and propagated verbatim
    /// Generic error from the storage backend
    BackendError,
    /// The native filter could not be evaluated
    FilterError,
    /// The native update document could not be applied
    UpdateError,
    /// A document with the same `_id` already exists
    DuplicateKey,
    /// The provided identifier is invalid
    InvalidId,

    // Usage Errors
    /// The operation is not valid in the current context
    InvalidOperation,
    /// The store driver has no multi-document transaction primitive
    TransactionNotSupported,
    /// Collection does not exist
    CollectionNotFound,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ConnectionError => write!(f, "Connection error"),
            ErrorKind::SecurityError => write!(f, "Security error"),
            ErrorKind::InvalidConfiguration => write!(f, "Invalid configuration"),
            ErrorKind::DatabaseClosed => write!(f, "Database closed"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::UpdateError => write!(f, "Update error"),
            ErrorKind::DuplicateKey => write!(f, "Duplicate key"),
            ErrorKind::InvalidId => write!(f, "Invalid ID"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::TransactionNotSupported => write!(f, "Transaction not supported"),
            ErrorKind::CollectionNotFound => write!(f, "Collection not found"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type shared by the adaptor layer and every store driver.
///
/// `UopError` carries a message, an [ErrorKind], an optional cause and the
/// backtrace captured at construction. Drivers build these errors themselves,
/// so the collection layer can hand them back to the caller untouched.
///
/// # Examples
///
/// ```rust,ignore
/// use docuop::errors::{UopError, ErrorKind};
///
/// let cause = UopError::new("socket reset", ErrorKind::ConnectionError);
/// let err = UopError::new_with_cause("insert failed", ErrorKind::BackendError, cause);
/// ```
#[derive(Clone)]
pub struct UopError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<UopError>>,
    backtrace: Atomic<Backtrace>,
}

impl UopError {
    /// Creates a new `UopError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        UopError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `UopError` that wraps the error which caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: UopError) -> Self {
        UopError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&UopError> {
        self.cause.as_deref()
    }
}

impl Display for UopError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for UopError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for UopError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for adaptor operations.
pub type UopResult<T> = Result<T, UopError>;

impl From<std::io::Error> for UopError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::NotConnected
            | std::io::ErrorKind::TimedOut => ErrorKind::ConnectionError,
            std::io::ErrorKind::PermissionDenied => ErrorKind::SecurityError,
            _ => ErrorKind::BackendError,
        };
        UopError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<regex::Error> for UopError {
    fn from(err: regex::Error) -> Self {
        UopError::new(&format!("Invalid regular expression: {}", err), ErrorKind::FilterError)
    }
}

#[cfg(feature = "mongo")]
impl From<mongodb::error::Error> for UopError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind as MongoErrorKind, WriteFailure};

        // server codes: 2 BadValue, 11000 duplicate key
        let error_kind = match err.kind.as_ref() {
            MongoErrorKind::Authentication { .. } => ErrorKind::SecurityError,
            MongoErrorKind::ServerSelection { .. } | MongoErrorKind::Io(_) => {
                ErrorKind::ConnectionError
            }
            MongoErrorKind::InvalidArgument { .. } => ErrorKind::InvalidConfiguration,
            MongoErrorKind::Write(WriteFailure::WriteError(e)) if e.code == 11000 => {
                ErrorKind::DuplicateKey
            }
            MongoErrorKind::Command(e) if e.code == 2 => ErrorKind::FilterError,
            _ => ErrorKind::BackendError,
        };
        UopError::new(&format!("Store error: {}", err), error_kind)
    }
}

impl From<String> for UopError {
    fn from(msg: String) -> Self {
        UopError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for UopError {
    fn from(msg: &str) -> Self {
        UopError::new(msg, ErrorKind::InternalError)
    }
}
