//! Administrative handlers.

use std::collections::BTreeMap;

use tracing::debug;

use docmend_core::Error as CoreError;
use docmend_engine::{Catalog, TtlCache};

use crate::types::StatsSnapshot;
use crate::{Output, Result};

/// Handle Stats command.
///
/// Counts are served from the cache until it expires; a failed count leaves
/// the previous snapshot untouched and fails the command.
pub fn stats(catalog: &Catalog, cache: &TtlCache<BTreeMap<String, usize>>) -> Result<Output> {
    let entry = cache.get_or_refresh(|| {
        debug!(target: "docmend::executor", collections = catalog.len(), "Recomputing statistics");
        let mut counts = BTreeMap::new();
        for name in catalog.names() {
            let c = catalog.get(&name)?;
            let count = c.count().map_err(|source| CoreError::Store {
                collection: name.clone(),
                source,
            })?;
            counts.insert(name, count);
        }
        Ok::<_, CoreError>(counts)
    })?;

    Ok(Output::Stats(StatsSnapshot {
        computed_at: entry.computed_at.to_rfc3339(),
        counts: entry.value,
    }))
}
