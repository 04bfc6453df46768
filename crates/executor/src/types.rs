//! Supporting types for commands and outputs.
//!
//! Documents and values cross this boundary as plain JSON; identifiers are
//! rendered as 32-character hex strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use docmend_engine::{DedupeReport, Substitution, TransferFailure};

/// JSON value as exchanged with callers
pub type JsonValue = serde_json::Value;

// =============================================================================
// Command parameters
// =============================================================================

/// Which part of an appended value becomes an identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdSubstitution {
    /// The appended value itself
    Value,
    /// The named sub-fields of an appended object
    Fields(Vec<String>),
}

impl From<IdSubstitution> for Substitution {
    fn from(s: IdSubstitution) -> Self {
        match s {
            IdSubstitution::Value => Substitution::Value,
            IdSubstitution::Fields(names) => Substitution::Fields(names),
        }
    }
}

// =============================================================================
// Output payloads
// =============================================================================

/// Result of a mutating command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResult {
    /// Mutated documents
    pub documents: Vec<JsonValue>,
    /// Top-level fields touched, per document
    pub dirty: Vec<Vec<String>>,
    /// Operation-specific effect, per document
    pub effects: Vec<EffectInfo>,
    /// Whether the documents were saved
    pub persisted: bool,
}

/// What a mutation did to one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectInfo {
    /// Fields were written
    Changed,
    /// The array now holds `length` elements
    Duplicated {
        /// Length after duplication
        length: usize,
    },
    /// Duplicates were removed
    Deduplicated(DuplicateReport),
    /// This element was removed
    Removed(JsonValue),
}

/// Duplicate analysis of one array
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Elements before deduplication
    pub original_count: usize,
    /// Elements kept
    pub deduplicated_count: usize,
    /// Elements removed (or that would be removed)
    pub duplicates: Vec<JsonValue>,
}

impl From<DedupeReport> for DuplicateReport {
    fn from(r: DedupeReport) -> Self {
        DuplicateReport {
            original_count: r.original_count,
            deduplicated_count: r.deduplicated_count,
            duplicates: r.duplicates.into_iter().map(JsonValue::from).collect(),
        }
    }
}

/// Tally of a cross-collection transfer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransferSummary {
    /// Source documents matched
    pub sources: usize,
    /// Sources skipped for lack of a link or value
    pub skipped: usize,
    /// Linked documents found
    pub linked: usize,
    /// Linked documents written
    pub updated: usize,
    /// Individual failures
    pub failures: Vec<TransferFailureInfo>,
    /// Whether the linked documents were saved
    pub persisted: bool,
}

/// One linked document that could not be updated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferFailureInfo {
    /// Identifier of the document, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    /// What went wrong
    pub reason: String,
}

impl From<TransferFailure> for TransferFailureInfo {
    fn from(f: TransferFailure) -> Self {
        TransferFailureInfo {
            document: f.document,
            reason: f.reason,
        }
    }
}

/// Document counts per collection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// When the counts were computed, RFC 3339
    pub computed_at: String,
    /// Document count per collection name
    pub counts: BTreeMap<String, usize>,
}
