//! Cross-collection transfer
//!
//! Copies a field from every matching source document into the documents of
//! another collection that share its link value. Each linked document is
//! written and saved on its own: a failure is logged, recorded in the
//! [`TransferReport`] and skipped, never aborting the run.

use tracing::{info, warn};

use docmend_core::resolve;
use docmend_core::{Document, Error, FieldPath, Result, Value};

use crate::collection::{Collection, Filter};
use crate::dirty::{self, DirtySet};
use crate::gateway::Gateway;

/// What to copy, from where, to where
pub struct TransferPlan<'a> {
    /// Collection read from
    pub from: &'a dyn Collection,
    /// Selects source documents
    pub from_filter: Option<&'a Filter>,
    /// Field whose value links a source to its targets, in both collections
    pub link_field: FieldPath,
    /// Field copied from each source
    pub from_field: FieldPath,
    /// Collection written to
    pub to: &'a dyn Collection,
    /// Field written in each linked document
    pub to_field: FieldPath,
}

/// One linked document that could not be updated
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFailure {
    /// Identifier of the document, when known
    pub document: Option<String>,
    /// What went wrong
    pub reason: String,
}

/// Tally of a transfer run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferReport {
    /// Source documents matched
    pub sources: usize,
    /// Sources without a link or source value
    pub skipped: usize,
    /// Linked documents found
    pub linked: usize,
    /// Linked documents written (saved, or previewed in a dry run)
    pub updated: usize,
    /// Individual failures
    pub failures: Vec<TransferFailure>,
    /// Updated documents
    pub documents: Vec<Document>,
}

impl Gateway {
    /// Copy `from_field` of each source into `to_field` of its linked documents
    pub fn transfer(&self, plan: &TransferPlan<'_>, persist: bool) -> Result<TransferReport> {
        let filter = plan.from_filter.ok_or(Error::MissingQuery)?;
        let sources = plan.from.find(filter).map_err(|source| Error::Store {
            collection: plan.from.name().to_string(),
            source,
        })?;

        let mut report = TransferReport {
            sources: sources.len(),
            ..TransferReport::default()
        };

        for source in &sources {
            let id_field = plan.from.id_field();
            let source_id = source.id_of(id_field).map(|id| id.to_hex());
            // A null link would match every target lacking the field
            let link = resolve::get(source, &plan.link_field, id_field)
                .ok()
                .flatten()
                .filter(|link| !link.is_null());
            let value = resolve::get(source, &plan.from_field, id_field).ok().flatten();
            let (Some(link), Some(value)) = (link, value) else {
                warn!(
                    target: "docmend::transfer",
                    source = ?source_id,
                    link_field = %plan.link_field,
                    from_field = %plan.from_field,
                    "Skipping source without link or value"
                );
                report.skipped += 1;
                continue;
            };

            let linked_filter = Filter::all().eq(plan.link_field.clone(), link.clone());
            let linked = match plan.to.find(&linked_filter) {
                Ok(linked) => linked,
                Err(e) => {
                    warn!(
                        target: "docmend::transfer",
                        source = ?source_id,
                        collection = %plan.to.name(),
                        error = %e,
                        "Failed to look up linked documents"
                    );
                    report.failures.push(TransferFailure {
                        document: source_id,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            report.linked += linked.len();
            for document in linked {
                self.transfer_one(plan, document, value, persist, &mut report);
            }
        }

        info!(
            target: "docmend::transfer",
            from = %plan.from.name(),
            to = %plan.to.name(),
            sources = report.sources,
            updated = report.updated,
            failures = report.failures.len(),
            persist,
            "Transfer finished"
        );
        Ok(report)
    }

    fn transfer_one(
        &self,
        plan: &TransferPlan<'_>,
        mut document: Document,
        value: &Value,
        persist: bool,
        report: &mut TransferReport,
    ) {
        let target_id = document.id_of(plan.to.id_field()).map(|id| id.to_hex());
        let fail = |reason: String, report: &mut TransferReport| {
            warn!(
                target: "docmend::transfer",
                document = ?target_id,
                collection = %plan.to.name(),
                error = %reason,
                "Failed to update linked document"
            );
            report.failures.push(TransferFailure {
                document: target_id.clone(),
                reason,
            });
        };

        if let Err(e) = self.mutator().assign(&mut document, &plan.to_field, value.clone()) {
            fail(e.to_string(), report);
            return;
        }
        let mut dirty = DirtySet::new();
        dirty.touch(&plan.to_field);

        if !persist {
            report.updated += 1;
            report.documents.push(document);
            return;
        }
        match dirty::persist(plan.to, document, &dirty) {
            Ok(saved) => {
                report.updated += 1;
                report.documents.push(saved);
            }
            Err(e) => fail(e.to_string(), report),
        }
    }
}
