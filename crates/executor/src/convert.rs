//! Conversions between engine types and the executor's wire types.
//!
//! Engine errors become the executor's serializable [`Error`]; documents and
//! values become JSON.

use docmend_core::{Document, DocumentId, Error as CoreError, Value};

use crate::types::JsonValue;
use crate::Error;

/// Convert an engine error to an executor error.
///
/// Store failures are flattened to their rendering; the preview documents of
/// a persistence failure become JSON.
impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingQuery => Error::MissingQuery,
            CoreError::MissingField { field } => Error::MissingField { field },
            CoreError::NotFound { what } => Error::NotFound { what },
            CoreError::TypeMismatch {
                path,
                expected,
                found,
            } => Error::TypeMismatch {
                path,
                expected: expected.to_string(),
                found: found.to_string(),
            },
            CoreError::InvalidOperation { reason } => Error::InvalidOperation { reason },
            err @ CoreError::InvalidPath { .. } => Error::InvalidOperation {
                reason: err.to_string(),
            },
            CoreError::InvalidIdentifier { value, reason } => {
                Error::InvalidIdentifier { value, reason }
            }
            CoreError::NotAnArray { path, found } => Error::NotAnArray {
                path,
                found: found.to_string(),
            },
            CoreError::PersistenceFailure {
                collection,
                source,
                preview,
            } => Error::PersistenceFailure {
                collection,
                reason: source.to_string(),
                preview: documents_to_json(&preview),
            },
            CoreError::Store { collection, source } => Error::Store {
                collection,
                reason: source.to_string(),
            },
            CoreError::Config { reason } => Error::Config { reason },
        }
    }
}

/// Render documents as JSON objects
pub(crate) fn documents_to_json(documents: &[Document]) -> Vec<JsonValue> {
    documents.iter().map(Document::to_json).collect()
}

/// Build a document from a JSON object
///
/// A string in the identifier field is converted to an identifier, since
/// JSON has no identifier type of its own.
pub(crate) fn document_from_json(json: JsonValue, id_field: &str) -> Result<Document, Error> {
    let mut document = Document::from_json(json)?;
    let id = match document.get(id_field) {
        Some(raw @ Value::String(_)) => Some(DocumentId::from_value(raw)?),
        _ => None,
    };
    if let Some(id) = id {
        document.insert(id_field, Value::Id(id));
    }
    Ok(document)
}
