//! # docmend executor
//!
//! The command interface to docmend: operators (or an HTTP layer in front of
//! them) submit a [`Command`] with a [`Context`] and receive an [`Output`] or
//! an [`Error`].
//!
//! ## Commands
//!
//! | Category | Commands |
//! |----------|----------|
//! | **Reads** | `Find`, `Read`, `FindDuplicates`, `Stats`, `Collections` |
//! | **Changes** | `Update` (set / setId / setStatus / append descriptors) |
//! | **Arrays** | `AppendWithIds`, `Inject`, `Duplicate`, `RemoveDuplicates`, `RemoveElement` |
//! | **Documents** | `Create`, `Delete` |
//! | **Cross-collection** | `Transfer` |
//!
//! ## Dry runs
//!
//! Every mutating command carries `save`. It is honored only when the
//! context allows saving; otherwise the command computes its result, returns
//! it with `persisted: false` and leaves the store untouched.
//!
//! ```
//! use std::sync::Arc;
//! use docmend_engine::{Catalog, EngineConfig, MemoryCollection};
//! use docmend_executor::{Command, Context, Executor};
//! use serde_json::json;
//!
//! let forms = Arc::new(MemoryCollection::new("forms"));
//! let catalog = Arc::new(Catalog::new());
//! catalog.register(forms.clone());
//! let executor = Executor::new(catalog, &EngineConfig::default());
//!
//! executor.execute(&Context::new("ops"), Command::Create {
//!     collection: "forms".into(),
//!     documents: vec![json!({"name": "intake", "tags": ["a", "b"]})],
//!     save: true,
//! }).unwrap();
//!
//! let out = executor.execute(&Context::read_only("ops"), Command::Update {
//!     collection: "forms".into(),
//!     query: Some(json!({"name": "intake"})),
//!     changes: json!({"path": "tags", "append": "c"}),
//!     many: false,
//!     save: true,
//! }).unwrap();
//!
//! assert!(!out.persisted());
//! assert_eq!(forms.save_count(), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bridge;
mod command;
mod context;
mod convert;
mod error;
mod executor;
mod handlers;
mod output;
pub mod types;

#[cfg(test)]
mod tests;

pub use command::Command;
pub use context::Context;
pub use error::{Error, ErrorReport};
pub use executor::Executor;
pub use output::Output;

pub use docmend_core::ErrorKind;

/// Result type alias for executor operations
pub type Result<T> = std::result::Result<T, Error>;
