//! docmend - path-addressed inspection and repair for schema-less document stores
//!
//! docmend fetches documents from a store, edits them in memory through
//! dotted paths (with identifier selectors for array elements), and either
//! returns the result as a preview or persists it with explicit dirty-field
//! tracking.
//!
//! # Architecture
//!
//! All operations go through the [`Executor`], which provides a command-based
//! API. Store adapters implement [`Collection`] and are registered in a
//! [`Catalog`]; [`MemoryCollection`] is the in-process reference adapter.
//!
//! Internal implementation details (path resolution, mutation, persistence)
//! live in `docmend-core` and `docmend-engine`.

// Re-export the public API from docmend-executor
pub use docmend_executor::*;

pub use docmend_engine::{Catalog, Collection, EngineConfig, MemoryCollection};
