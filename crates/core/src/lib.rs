//! Core types for docmend
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: Unified value enum for schema-less document content
//! - Document: One record, plus its modified-field marks
//! - DocumentId / Timestamp: Store identifier and instant types
//! - FieldPath: Dotted path with positional and identifier segments
//! - resolve: Generic path traversal over any `Structural` root
//! - Error: Error taxonomy shared by every layer

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod id;
pub mod path;
pub mod resolve;
pub mod timestamp;
pub mod value;

pub use document::{Container, ContainerMut, Document, Structural, ID_FIELD};
pub use error::{Error, ErrorKind, Result, StoreError, StoreErrorKind, StoreResult};
pub use id::DocumentId;
pub use path::{FieldPath, PathParseError, PathSegment, MAX_PATH_LENGTH};
pub use resolve::{Resolution, Slot};
pub use timestamp::Timestamp;
pub use value::{Map, Value};
