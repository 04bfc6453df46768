//! Change-descriptor handler.

use docmend_engine::{Catalog, Change, Gateway, Mutation, Target};

use crate::bridge::{collection, json_to_value, mutation_output, parse_filter};
use crate::types::JsonValue;
use crate::{Output, Result};

/// Handle Update command.
///
/// `changes` is one change object (`{"path": ..., "<op>": value}`) or an
/// array of them, applied in order. All changes are parsed before any
/// document is fetched.
pub fn update(
    catalog: &Catalog,
    gateway: &Gateway,
    name: &str,
    query: Option<JsonValue>,
    changes: JsonValue,
    many: bool,
    persist: bool,
) -> Result<Output> {
    let c = collection(catalog, name)?;
    let filter = parse_filter(query)?;
    let changes = Change::parse_all(&json_to_value(changes))?;
    let target = if many { Target::Many } else { Target::One };

    let applied = gateway.execute(
        c.as_ref(),
        filter.as_ref(),
        target,
        &Mutation::Changes(changes),
        persist,
    )?;
    Ok(mutation_output(applied))
}
