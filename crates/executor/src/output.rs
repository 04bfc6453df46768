//! Output enum for command results.
//!
//! Every successful command returns exactly one [`Output`] variant; the
//! `Returns:` line on each [`Command`](crate::Command) variant names which.

use serde::{Deserialize, Serialize};

use crate::types::{DuplicateReport, JsonValue, MutationResult, StatsSnapshot, TransferSummary};

/// Successful command result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// Matching documents
    Documents(Vec<JsonValue>),

    /// A single value
    Value(JsonValue),

    /// Documents after a mutation
    Mutated(MutationResult),

    /// Duplicate analysis of an array
    Duplicates(DuplicateReport),

    /// Inserted documents
    Created {
        /// Documents as inserted, identifiers included
        documents: Vec<JsonValue>,
        /// Whether they were saved
        persisted: bool,
    },

    /// Removed documents
    Deleted {
        /// Documents as they were before removal
        documents: Vec<JsonValue>,
        /// Whether they were actually removed
        persisted: bool,
    },

    /// Transfer tally
    Transferred(TransferSummary),

    /// Collection statistics
    Stats(StatsSnapshot),

    /// Registered collection names
    Collections(Vec<String>),
}

impl Output {
    /// Whether the command's result was written to the store
    ///
    /// Read-only outputs report `false`.
    pub fn persisted(&self) -> bool {
        match self {
            Output::Mutated(m) => m.persisted,
            Output::Created { persisted, .. } | Output::Deleted { persisted, .. } => *persisted,
            Output::Transferred(t) => t.persisted,
            Output::Documents(_)
            | Output::Value(_)
            | Output::Duplicates(_)
            | Output::Stats(_)
            | Output::Collections(_) => false,
        }
    }
}
