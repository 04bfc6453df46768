//! Cross-collection transfer handler.

use docmend_engine::{Catalog, Gateway, TransferPlan};

use crate::bridge::{collection, parse_filter, parse_path};
use crate::types::{JsonValue, TransferSummary};
use crate::{Output, Result};

/// Arguments of a Transfer command
pub struct TransferArgs<'a> {
    /// Source collection name
    pub from: &'a str,
    /// Filter over the source collection
    pub query: Option<JsonValue>,
    /// Field linking source and target documents
    pub link_field: &'a str,
    /// Field read from each source
    pub from_field: &'a str,
    /// Target collection name
    pub to: &'a str,
    /// Field written in each linked document
    pub to_field: &'a str,
}

/// Handle Transfer command.
///
/// Per-document failures are reported in the summary; only a missing query,
/// an unknown collection, a bad path or a failed source lookup fail the
/// command as a whole.
pub fn transfer(
    catalog: &Catalog,
    gateway: &Gateway,
    args: TransferArgs<'_>,
    persist: bool,
) -> Result<Output> {
    let from = collection(catalog, args.from)?;
    let to = collection(catalog, args.to)?;
    let filter = parse_filter(args.query)?;

    let plan = TransferPlan {
        from: from.as_ref(),
        from_filter: filter.as_ref(),
        link_field: parse_path(args.link_field)?,
        from_field: parse_path(args.from_field)?,
        to: to.as_ref(),
        to_field: parse_path(args.to_field)?,
    };
    let report = gateway.transfer(&plan, persist)?;

    Ok(Output::Transferred(TransferSummary {
        sources: report.sources,
        skipped: report.skipped,
        linked: report.linked,
        updated: report.updated,
        failures: report.failures.into_iter().map(Into::into).collect(),
        persisted: persist,
    }))
}
