//! Store-assigned document identifiers
//!
//! Every persisted document carries a [`DocumentId`] in its identifier field.
//! Identifiers are 128-bit values rendered as 32 lowercase hex characters.
//! Parsing also accepts the hyphenated UUID form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::value::Value;

/// Unique identifier of a document (or of an embedded sub-document)
///
/// # Examples
///
/// ```
/// use docmend_core::DocumentId;
///
/// let id = DocumentId::new();
/// let parsed: DocumentId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        DocumentId(Uuid::new_v4())
    }

    /// Build an identifier from raw bytes
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        DocumentId(Uuid::from_bytes(bytes))
    }

    /// Raw bytes of the identifier
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Canonical 32-character hex rendering
    pub fn to_hex(&self) -> String {
        self.0.simple().to_string()
    }

    /// Convert an arbitrary value into an identifier
    ///
    /// Accepts an existing `Id`, or a string in hex / hyphenated form.
    /// Everything else fails with [`Error::InvalidIdentifier`].
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Id(id) => Ok(*id),
            Value::String(s) => s.parse(),
            other => Err(Error::InvalidIdentifier {
                value: other.to_string(),
                reason: format!("cannot convert {} to an identifier", other.type_name()),
            }),
        }
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Uuid::parse_str(trimmed)
            .map(DocumentId)
            .map_err(|e| Error::InvalidIdentifier {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl From<Uuid> for DocumentId {
    fn from(uuid: Uuid) -> Self {
        DocumentId(uuid)
    }
}
