//! Error types for docmend
//!
//! All engine failures are represented by [`Error`]. Each variant maps to
//! exactly one [`ErrorKind`], the stable taxonomy callers branch on.
//! Store adapters report their own failures as [`StoreError`]; the engine
//! wraps them without interpretation.
//!
//! | Kind | Raised when |
//! |------|-------------|
//! | `MissingQuery` | a filter is required but absent |
//! | `MissingField` | a required descriptor field is absent |
//! | `NotFound` | no document (or path / element) matched where one was required |
//! | `TypeMismatch` | an operation met a scalar where it needs a container, or vice versa |
//! | `InvalidOperation` | unrecognized or malformed change, bad path syntax |
//! | `InvalidIdentifier` | a value cannot become a store identifier |
//! | `NotAnArray` | an array operation targets an absent or non-array field |
//! | `PersistenceFailure` | the store rejected a save |
//! | `Store` | the store failed a read (timeout, cancellation, backend) |
//! | `Config` | the configuration file is unreadable or invalid |

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::document::Document;
use crate::path::PathParseError;

/// Result type alias for docmend operations
pub type Result<T> = std::result::Result<T, Error>;

/// Stable error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A filter is required but absent
    MissingQuery,
    /// A required descriptor field is absent
    MissingField,
    /// Nothing matched where something was required
    NotFound,
    /// Container/scalar mismatch
    TypeMismatch,
    /// Unrecognized or malformed operation
    InvalidOperation,
    /// Value not convertible to an identifier
    InvalidIdentifier,
    /// Array operation on a non-array field
    NotAnArray,
    /// Store-level save error
    PersistenceFailure,
    /// Store-level read error
    Store,
    /// Configuration error
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MissingQuery => "MissingQuery",
            ErrorKind::MissingField => "MissingField",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::TypeMismatch => "TypeMismatch",
            ErrorKind::InvalidOperation => "InvalidOperation",
            ErrorKind::InvalidIdentifier => "InvalidIdentifier",
            ErrorKind::NotAnArray => "NotAnArray",
            ErrorKind::PersistenceFailure => "PersistenceFailure",
            ErrorKind::Store => "Store",
            ErrorKind::Config => "Config",
        };
        f.write_str(name)
    }
}

/// Engine error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A filter is required but absent
    #[error("missing query: a filter is required")]
    MissingQuery,

    /// A required descriptor field is absent
    #[error("missing field: {field}")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// Nothing matched where something was required
    #[error("not found: {what}")]
    NotFound {
        /// Description of what was looked for
        what: String,
    },

    /// Container/scalar mismatch during traversal or mutation
    #[error("type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Path at which the mismatch occurred
        path: String,
        /// Expected type
        expected: &'static str,
        /// Actual type found
        found: &'static str,
    },

    /// Unrecognized or malformed operation
    #[error("invalid operation: {reason}")]
    InvalidOperation {
        /// Why the operation was rejected
        reason: String,
    },

    /// Path string could not be parsed
    #[error("invalid path '{path}': {source}")]
    InvalidPath {
        /// The offending path string
        path: String,
        /// Parse failure
        source: PathParseError,
    },

    /// Value not convertible to an identifier
    #[error("invalid identifier {value}: {reason}")]
    InvalidIdentifier {
        /// Rendering of the rejected value
        value: String,
        /// Conversion failure
        reason: String,
    },

    /// Array operation on an absent or non-array field
    #[error("not an array at '{path}': found {found}")]
    NotAnArray {
        /// Path of the field
        path: String,
        /// Actual type found (`"absent"` when missing)
        found: &'static str,
    },

    /// The store rejected a save
    ///
    /// `preview` holds the in-memory mutation result so operators can see
    /// what would have been written.
    #[error("persistence failure in '{collection}': {source}")]
    PersistenceFailure {
        /// Collection the save targeted
        collection: String,
        /// Underlying store error
        source: StoreError,
        /// Mutated documents as computed in memory
        preview: Vec<Document>,
    },

    /// The store failed a read
    #[error("store error in '{collection}': {source}")]
    Store {
        /// Collection being read
        collection: String,
        /// Underlying store error
        source: StoreError,
    },

    /// Configuration error
    #[error("configuration error: {reason}")]
    Config {
        /// Why the configuration was rejected
        reason: String,
    },
}

impl Error {
    /// The taxonomy entry for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingQuery => ErrorKind::MissingQuery,
            Error::MissingField { .. } => ErrorKind::MissingField,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::InvalidOperation { .. } | Error::InvalidPath { .. } => {
                ErrorKind::InvalidOperation
            }
            Error::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            Error::NotAnArray { .. } => ErrorKind::NotAnArray,
            Error::PersistenceFailure { .. } => ErrorKind::PersistenceFailure,
            Error::Store { .. } => ErrorKind::Store,
            Error::Config { .. } => ErrorKind::Config,
        }
    }

    /// Create a NotFound error
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound { what: what.into() }
    }

    /// Create an InvalidOperation error
    pub fn invalid_operation(reason: impl Into<String>) -> Self {
        Error::InvalidOperation {
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Error::MissingField {
            field: field.into(),
        }
    }
}

// =============================================================================
// Store errors
// =============================================================================

/// Category of a store failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreErrorKind {
    /// The store call exceeded its deadline
    Timeout,
    /// The store call was cancelled
    Cancelled,
    /// The store rejected a write as conflicting
    Conflict,
    /// Any other backend failure
    Backend,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreErrorKind::Timeout => f.write_str("timeout"),
            StoreErrorKind::Cancelled => f.write_str("cancelled"),
            StoreErrorKind::Conflict => f.write_str("conflict"),
            StoreErrorKind::Backend => f.write_str("backend"),
        }
    }
}

/// Failure reported by a store adapter
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct StoreError {
    /// Failure category
    pub kind: StoreErrorKind,
    /// Adapter-supplied detail
    pub message: String,
}

impl StoreError {
    /// Create a store error of the given kind
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        StoreError {
            kind,
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Timeout, message)
    }

    /// Create a backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Backend, message)
    }
}

/// Result type alias for store adapter calls
pub type StoreResult<T> = std::result::Result<T, StoreError>;
