//! Mutation engine for docmend
//!
//! This crate turns path-addressed edits into store writes:
//! - Mutator: change descriptors (`apply`) and array operations (`array`)
//! - DirtySet: top-level fields a mutation touched, required to persist
//! - Collection: the store capability, with an in-memory implementation
//! - Gateway: filter → fetch → mutate → dry run or persist
//! - Transfer: copy a field across collections by a shared link value
//! - TtlCache / EngineConfig: statistics cache and `docmend.toml`
//!
//! The engine holds no documents between requests and performs no
//! concurrency control of its own.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod apply;
pub mod array;
pub mod cache;
pub mod clock;
pub mod collection;
pub mod config;
pub mod dirty;
pub mod gateway;
pub mod transfer;

pub use apply::{apply, Change, Mutator, Operation};
pub use array::{DedupeReport, Substitution, LOCALIZED_OPTIONS_FIELD};
pub use cache::{CacheEntry, TtlCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use collection::{Catalog, Collection, Filter, MemoryCollection};
pub use config::{EngineConfig, CONFIG_FILE_NAME};
pub use dirty::DirtySet;
pub use gateway::{Applied, Effect, Gateway, Mutation, Outcome, Target};
pub use transfer::{TransferFailure, TransferPlan, TransferReport};
