//! Request context.

use serde::{Deserialize, Serialize};

/// Who issued a command and what they may do
///
/// A command persists only when it asks to (`save`) and the context allows
/// it; otherwise it runs as a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Identity of the caller, recorded in logs
    pub actor: String,
    /// Whether commands in this context may write to the store
    pub save_allowed: bool,
}

impl Context {
    /// Context permitted to save
    pub fn new(actor: impl Into<String>) -> Self {
        Context {
            actor: actor.into(),
            save_allowed: true,
        }
    }

    /// Context restricted to dry runs
    pub fn read_only(actor: impl Into<String>) -> Self {
        Context {
            actor: actor.into(),
            save_allowed: false,
        }
    }

    /// Effective persistence for a command asking for `save`
    pub fn persist(&self, save: bool) -> bool {
        save && self.save_allowed
    }
}
