//! Command enum defining all docmend operations.
//!
//! Commands are the "instruction set" of the executor. Every operator
//! request is expressed as a [`Command`] variant plus a
//! [`Context`](crate::Context). Commands are serializable and externally
//! tagged; unknown fields are rejected.
//!
//! Mutating commands carry a `save` flag. The documents are written only when
//! `save` is set *and* the context allows saving; otherwise the command runs
//! as a dry run and returns the would-be documents.

use serde::{Deserialize, Serialize};

use crate::types::{IdSubstitution, JsonValue};

/// A command to execute against the catalog.
///
/// `query` is a JSON object of `dotted.path: value` equality clauses. It is
/// optional on the wire so that its absence can be reported as
/// `MissingQuery` rather than a deserialization failure.
///
/// # Example
///
/// ```
/// use docmend_executor::Command;
///
/// let cmd: Command = serde_json::from_str(r#"{
///     "Update": {
///         "collection": "forms",
///         "query": {"name": "intake"},
///         "changes": [{"path": "tags", "append": "urgent"}],
///         "save": true
///     }
/// }"#).unwrap();
/// assert!(matches!(cmd, Command::Update { save: true, .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Reads ====================
    /// All documents matching the query.
    /// Returns: `Output::Documents`
    Find {
        /// Collection name
        collection: String,
        /// Equality filter
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<JsonValue>,
    },

    /// Value at a path in the one matching document; `null` when absent.
    /// Returns: `Output::Value`
    Read {
        /// Collection name
        collection: String,
        /// Equality filter
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<JsonValue>,
        /// Dotted path; empty for the whole document
        #[serde(default)]
        path: String,
    },

    // ==================== Change descriptors ====================
    /// Apply change descriptors to the matching document(s).
    /// Returns: `Output::Mutated`
    Update {
        /// Collection name
        collection: String,
        /// Equality filter
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<JsonValue>,
        /// One change object or an array of them
        changes: JsonValue,
        /// Mutate every match instead of exactly one
        #[serde(default)]
        many: bool,
        /// Persist the result
        #[serde(default)]
        save: bool,
    },

    // ==================== Array operations ====================
    /// Push a value, converting parts of it to identifiers first.
    /// Returns: `Output::Mutated`
    AppendWithIds {
        /// Collection name
        collection: String,
        /// Equality filter
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<JsonValue>,
        /// Array field
        path: String,
        /// Value to push
        value: JsonValue,
        /// Which parts become identifiers
        #[serde(default, skip_serializing_if = "Option::is_none")]
        substitute: Option<IdSubstitution>,
        /// Persist the result
        #[serde(default)]
        save: bool,
    },

    /// Push values into an array below identifier selectors.
    /// Returns: `Output::Mutated`
    Inject {
        /// Collection name
        collection: String,
        /// Equality filter
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<JsonValue>,
        /// Array field, e.g. `sections.<id>.fields.<id>.enum_opts`
        path: String,
        /// Values to push
        values: Vec<JsonValue>,
        /// Locale for `enum_opts` wrapping; the configured default otherwise
        #[serde(default, skip_serializing_if = "Option::is_none")]
        locale: Option<String>,
        /// Persist the result
        #[serde(default)]
        save: bool,
    },

    /// Append a deep copy of every element of an array.
    /// Returns: `Output::Mutated`
    Duplicate {
        /// Collection name
        collection: String,
        /// Equality filter
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<JsonValue>,
        /// Array field
        path: String,
        /// Persist the result
        #[serde(default)]
        save: bool,
    },

    /// Report duplicates in an array without changing it.
    /// Returns: `Output::Duplicates`
    FindDuplicates {
        /// Collection name
        collection: String,
        /// Equality filter
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<JsonValue>,
        /// Array field
        path: String,
        /// Sub-field to key on; the element identifier when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },

    /// Remove elements whose key was already seen.
    /// Returns: `Output::Mutated`
    RemoveDuplicates {
        /// Collection name
        collection: String,
        /// Equality filter
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<JsonValue>,
        /// Array field
        path: String,
        /// Sub-field to key on; the element identifier when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
        /// Persist the result
        #[serde(default)]
        save: bool,
    },

    /// Splice one selected element out of an array.
    /// Returns: `Output::Mutated`
    RemoveElement {
        /// Collection name
        collection: String,
        /// Equality filter
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<JsonValue>,
        /// Path whose last segment selects the element
        path: String,
        /// Persist the result
        #[serde(default)]
        save: bool,
    },

    // ==================== Documents ====================
    /// Insert documents, assigning identifiers where missing.
    /// Returns: `Output::Created`
    Create {
        /// Collection name
        collection: String,
        /// JSON objects to insert
        documents: Vec<JsonValue>,
        /// Persist the result
        #[serde(default)]
        save: bool,
    },

    /// Remove every matching document.
    /// Returns: `Output::Deleted`
    Delete {
        /// Collection name
        collection: String,
        /// Equality filter
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<JsonValue>,
        /// Persist the result
        #[serde(default)]
        save: bool,
    },

    // ==================== Cross-collection ====================
    /// Copy a field into linked documents of another collection.
    /// Returns: `Output::Transferred`
    Transfer {
        /// Source collection
        from: String,
        /// Filter over the source collection
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<JsonValue>,
        /// Field linking source and target documents
        link_field: String,
        /// Field read from each source
        from_field: String,
        /// Target collection
        to: String,
        /// Field written in each linked document
        to_field: String,
        /// Persist the result
        #[serde(default)]
        save: bool,
    },

    // ==================== Administration ====================
    /// Document count per registered collection, cached.
    /// Returns: `Output::Stats`
    Stats,

    /// Names of the registered collections.
    /// Returns: `Output::Collections`
    Collections,
}

impl Command {
    /// Short name of the command, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Find { .. } => "Find",
            Command::Read { .. } => "Read",
            Command::Update { .. } => "Update",
            Command::AppendWithIds { .. } => "AppendWithIds",
            Command::Inject { .. } => "Inject",
            Command::Duplicate { .. } => "Duplicate",
            Command::FindDuplicates { .. } => "FindDuplicates",
            Command::RemoveDuplicates { .. } => "RemoveDuplicates",
            Command::RemoveElement { .. } => "RemoveElement",
            Command::Create { .. } => "Create",
            Command::Delete { .. } => "Delete",
            Command::Transfer { .. } => "Transfer",
            Command::Stats => "Stats",
            Command::Collections => "Collections",
        }
    }

    /// Whether the command asks to persist its result
    pub fn wants_save(&self) -> bool {
        match self {
            Command::Update { save, .. }
            | Command::AppendWithIds { save, .. }
            | Command::Inject { save, .. }
            | Command::Duplicate { save, .. }
            | Command::RemoveDuplicates { save, .. }
            | Command::RemoveElement { save, .. }
            | Command::Create { save, .. }
            | Command::Delete { save, .. }
            | Command::Transfer { save, .. } => *save,
            Command::Find { .. }
            | Command::Read { .. }
            | Command::FindDuplicates { .. }
            | Command::Stats
            | Command::Collections => false,
        }
    }
}
