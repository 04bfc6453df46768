//! Error types for command execution.
//!
//! All errors from command execution are represented by the [`Error`] enum.
//! Unlike the engine's error, these are:
//! - **Serializable**: they cross the operator boundary as JSON
//! - **Self-contained**: store failures are flattened to text, previews to JSON
//!
//! [`Error::report`] renders any variant as the flat
//! `{kind, message, context}` shape operators consume.

use serde::{Deserialize, Serialize};

use docmend_core::ErrorKind;

use crate::types::JsonValue;

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Request | `MissingQuery`, `MissingField`, `InvalidOperation` | Malformed command |
/// | Lookup | `NotFound` | Nothing matched |
/// | Shape | `TypeMismatch`, `NotAnArray`, `InvalidIdentifier` | Document disagrees with the edit |
/// | Store | `PersistenceFailure`, `Store` | The store failed a call |
/// | System | `Config` | Configuration problem |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Request ====================
    /// A filter is required but absent
    #[error("missing query: a filter is required")]
    MissingQuery,

    /// A required field is absent
    #[error("missing field: {field}")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// Unrecognized or malformed operation, including bad paths
    #[error("invalid operation: {reason}")]
    InvalidOperation {
        /// Why the operation was rejected
        reason: String,
    },

    // ==================== Lookup ====================
    /// Nothing matched where something was required
    #[error("not found: {what}")]
    NotFound {
        /// Description of what was looked for
        what: String,
    },

    // ==================== Shape ====================
    /// Container/scalar mismatch
    #[error("type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Path of the mismatch
        path: String,
        /// Expected type
        expected: String,
        /// Actual type
        found: String,
    },

    /// Array operation on an absent or non-array field
    #[error("not an array at '{path}': found {found}")]
    NotAnArray {
        /// Path of the field
        path: String,
        /// Actual type, `absent` when missing
        found: String,
    },

    /// Value not convertible to an identifier
    #[error("invalid identifier {value}: {reason}")]
    InvalidIdentifier {
        /// Rendering of the rejected value
        value: String,
        /// Conversion failure
        reason: String,
    },

    // ==================== Store ====================
    /// The store rejected a save; `preview` holds the unsaved documents
    #[error("failed to persist to '{collection}': {reason}")]
    PersistenceFailure {
        /// Collection written to
        collection: String,
        /// Store failure
        reason: String,
        /// Documents as mutated in memory
        preview: Vec<JsonValue>,
    },

    /// The store failed a read
    #[error("store error in '{collection}': {reason}")]
    Store {
        /// Collection read from
        collection: String,
        /// Store failure
        reason: String,
    },

    // ==================== System ====================
    /// Configuration error
    #[error("configuration error: {reason}")]
    Config {
        /// Why the configuration was rejected
        reason: String,
    },
}

/// Flat rendering of an [`Error`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Taxonomy entry
    pub kind: ErrorKind,
    /// Human-readable description
    pub message: String,
    /// Structured details, when the error carries any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<JsonValue>,
}

impl Error {
    /// The taxonomy entry for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingQuery => ErrorKind::MissingQuery,
            Error::MissingField { .. } => ErrorKind::MissingField,
            Error::InvalidOperation { .. } => ErrorKind::InvalidOperation,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::NotAnArray { .. } => ErrorKind::NotAnArray,
            Error::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            Error::PersistenceFailure { .. } => ErrorKind::PersistenceFailure,
            Error::Store { .. } => ErrorKind::Store,
            Error::Config { .. } => ErrorKind::Config,
        }
    }

    /// Structured details of the error, if any
    pub fn context(&self) -> Option<JsonValue> {
        match self {
            Error::MissingQuery | Error::InvalidOperation { .. } | Error::Config { .. } => None,
            Error::MissingField { field } => Some(serde_json::json!({ "field": field })),
            Error::NotFound { what } => Some(serde_json::json!({ "what": what })),
            Error::TypeMismatch {
                path,
                expected,
                found,
            } => Some(serde_json::json!({
                "path": path,
                "expected": expected,
                "found": found,
            })),
            Error::NotAnArray { path, found } => {
                Some(serde_json::json!({ "path": path, "found": found }))
            }
            Error::InvalidIdentifier { value, .. } => Some(serde_json::json!({ "value": value })),
            Error::PersistenceFailure {
                collection,
                preview,
                ..
            } => Some(serde_json::json!({
                "collection": collection,
                "preview": preview,
            })),
            Error::Store { collection, .. } => {
                Some(serde_json::json!({ "collection": collection }))
            }
        }
    }

    /// Render as `{kind, message, context}`
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
            context: self.context(),
        }
    }
}
