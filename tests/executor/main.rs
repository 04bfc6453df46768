//! Executor Layer Tests
//!
//! Tests for the docmend-executor crate which provides:
//! - Command enum - the instruction set
//! - Output enum - typed results
//! - Context - who is asking and whether they may save
//! - Executor - command dispatch over a catalog

mod common;

mod command_dispatch;
mod error_handling;
