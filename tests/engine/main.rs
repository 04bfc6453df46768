//! Engine Layer Tests
//!
//! End-to-end tests of docmend-engine against in-memory and failing stores:
//! - Documented mutation scenarios
//! - Dirty tracking and the save path
//! - Store failures during persistence and transfer
//! - Configuration files

mod common;

mod config_file;
mod dirty_tracking;
mod persistence_failures;
mod scenarios;
mod transfer;
