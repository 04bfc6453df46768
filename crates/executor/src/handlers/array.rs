//! Array operation handlers.
//!
//! Each handler targets exactly one document: the one matching the query.

use docmend_engine::{Catalog, Gateway, Mutation, Target};

use crate::bridge::{collection, json_to_value, mutation_output, parse_filter, parse_path};
use crate::types::{IdSubstitution, JsonValue};
use crate::{Output, Result};

fn run(
    catalog: &Catalog,
    gateway: &Gateway,
    name: &str,
    query: Option<JsonValue>,
    mutation: Mutation,
    persist: bool,
) -> Result<Output> {
    let c = collection(catalog, name)?;
    let filter = parse_filter(query)?;
    let applied = gateway.execute(c.as_ref(), filter.as_ref(), Target::One, &mutation, persist)?;
    Ok(mutation_output(applied))
}

/// Handle AppendWithIds command.
#[allow(clippy::too_many_arguments)]
pub fn append_with_ids(
    catalog: &Catalog,
    gateway: &Gateway,
    name: &str,
    query: Option<JsonValue>,
    path: &str,
    value: JsonValue,
    substitute: Option<IdSubstitution>,
    persist: bool,
) -> Result<Output> {
    let mutation = Mutation::AppendWithIds {
        path: parse_path(path)?,
        value: json_to_value(value),
        substitution: substitute.map(Into::into),
    };
    run(catalog, gateway, name, query, mutation, persist)
}

/// Handle Inject command.
#[allow(clippy::too_many_arguments)]
pub fn inject(
    catalog: &Catalog,
    gateway: &Gateway,
    name: &str,
    query: Option<JsonValue>,
    path: &str,
    values: Vec<JsonValue>,
    locale: Option<String>,
    persist: bool,
) -> Result<Output> {
    let mutation = Mutation::Inject {
        path: parse_path(path)?,
        values: values.into_iter().map(json_to_value).collect(),
        locale,
    };
    run(catalog, gateway, name, query, mutation, persist)
}

/// Handle Duplicate command.
pub fn duplicate(
    catalog: &Catalog,
    gateway: &Gateway,
    name: &str,
    query: Option<JsonValue>,
    path: &str,
    persist: bool,
) -> Result<Output> {
    let mutation = Mutation::Duplicate {
        path: parse_path(path)?,
    };
    run(catalog, gateway, name, query, mutation, persist)
}

/// Handle FindDuplicates command.
pub fn find_duplicates(
    catalog: &Catalog,
    gateway: &Gateway,
    name: &str,
    query: Option<JsonValue>,
    path: &str,
    key: Option<String>,
) -> Result<Output> {
    let c = collection(catalog, name)?;
    let filter = parse_filter(query)?;
    let path = parse_path(path)?;
    let report = gateway.find_duplicates(c.as_ref(), filter.as_ref(), &path, key.as_deref())?;
    Ok(Output::Duplicates(report.into()))
}

/// Handle RemoveDuplicates command.
#[allow(clippy::too_many_arguments)]
pub fn remove_duplicates(
    catalog: &Catalog,
    gateway: &Gateway,
    name: &str,
    query: Option<JsonValue>,
    path: &str,
    key: Option<String>,
    persist: bool,
) -> Result<Output> {
    let mutation = Mutation::Dedupe {
        path: parse_path(path)?,
        key,
    };
    run(catalog, gateway, name, query, mutation, persist)
}

/// Handle RemoveElement command.
pub fn remove_element(
    catalog: &Catalog,
    gateway: &Gateway,
    name: &str,
    query: Option<JsonValue>,
    path: &str,
    persist: bool,
) -> Result<Output> {
    let mutation = Mutation::RemoveElement {
        path: parse_path(path)?,
    };
    run(catalog, gateway, name, query, mutation, persist)
}
