//! Document-level handlers: reads, inserts and deletes.

use docmend_engine::{Catalog, Gateway};

use crate::bridge::{collection, parse_filter, parse_path};
use crate::convert::{document_from_json, documents_to_json};
use crate::types::JsonValue;
use crate::{Output, Result};

/// Handle Find command.
pub fn find(
    catalog: &Catalog,
    gateway: &Gateway,
    name: &str,
    query: Option<JsonValue>,
) -> Result<Output> {
    let c = collection(catalog, name)?;
    let filter = parse_filter(query)?;
    let documents = gateway.find(c.as_ref(), filter.as_ref())?;
    Ok(Output::Documents(documents_to_json(&documents)))
}

/// Handle Read command.
pub fn read(
    catalog: &Catalog,
    gateway: &Gateway,
    name: &str,
    query: Option<JsonValue>,
    path: &str,
) -> Result<Output> {
    let c = collection(catalog, name)?;
    let filter = parse_filter(query)?;
    let path = parse_path(path)?;
    let value = gateway.read(c.as_ref(), filter.as_ref(), &path)?;
    Ok(Output::Value(value.into()))
}

/// Handle Create command.
///
/// String identifiers in the incoming documents are converted before insert.
pub fn create(
    catalog: &Catalog,
    gateway: &Gateway,
    name: &str,
    documents: Vec<JsonValue>,
    persist: bool,
) -> Result<Output> {
    let c = collection(catalog, name)?;
    let documents = documents
        .into_iter()
        .map(|json| document_from_json(json, c.id_field()))
        .collect::<Result<Vec<_>>>()?;
    let created = gateway.create(c.as_ref(), documents, persist)?;
    Ok(Output::Created {
        documents: documents_to_json(&created),
        persisted: persist,
    })
}

/// Handle Delete command.
pub fn delete(
    catalog: &Catalog,
    gateway: &Gateway,
    name: &str,
    query: Option<JsonValue>,
    persist: bool,
) -> Result<Output> {
    let c = collection(catalog, name)?;
    let filter = parse_filter(query)?;
    let removed = gateway.delete(c.as_ref(), filter.as_ref(), persist)?;
    Ok(Output::Deleted {
        documents: documents_to_json(&removed),
        persisted: persist,
    })
}
