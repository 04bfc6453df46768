//! Bridge module: command arguments to engine types and back.
//!
//! - [`collection`]: resolves a collection name through the catalog
//! - [`parse_filter`] / [`parse_path`]: wire arguments to engine arguments
//! - [`mutation_output`]: gateway results to [`Output::Mutated`]

use std::sync::Arc;

use docmend_core::{FieldPath, Value};
use docmend_engine::{Applied, Catalog, Collection, Effect, Filter};

use crate::convert::documents_to_json;
use crate::types::{EffectInfo, JsonValue, MutationResult};
use crate::{Output, Result};

/// Look up a registered collection; unknown names are `NotFound`
pub fn collection(catalog: &Catalog, name: &str) -> Result<Arc<dyn Collection>> {
    Ok(catalog.get(name)?)
}

/// Parse an optional JSON query into a filter
///
/// Absence is preserved so the gateway can report `MissingQuery`.
pub fn parse_filter(query: Option<JsonValue>) -> Result<Option<Filter>> {
    query.map(Filter::from_json).transpose().map_err(Into::into)
}

/// Parse a dotted path; the empty string is the document root
pub fn parse_path(path: &str) -> Result<FieldPath> {
    Ok(FieldPath::parse(path)?)
}

/// Convert a JSON value into an engine value
pub fn json_to_value(json: JsonValue) -> Value {
    Value::from(json)
}

/// Render a gateway result as [`Output::Mutated`]
pub fn mutation_output(applied: Applied) -> Output {
    let dirty = applied
        .outcomes
        .iter()
        .map(|o| o.dirty.iter().map(str::to_string).collect())
        .collect();
    let effects = applied
        .outcomes
        .into_iter()
        .map(|o| match o.effect {
            Effect::Changed => EffectInfo::Changed,
            Effect::Duplicated { length } => EffectInfo::Duplicated { length },
            Effect::Deduplicated(report) => EffectInfo::Deduplicated(report.into()),
            Effect::Removed(value) => EffectInfo::Removed(value.into()),
        })
        .collect();

    Output::Mutated(MutationResult {
        documents: documents_to_json(&applied.documents),
        dirty,
        effects,
        persisted: applied.persisted,
    })
}
