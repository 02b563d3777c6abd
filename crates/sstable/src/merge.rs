//! Newest-wins merge across a set of SSTables, used by compaction.

use std::collections::BTreeMap;

use crate::{SSTable, SSTableError};

/// Merges `tables` (any order) into a single sorted map of the *final
/// resolved* live values, dropping any key whose newest record across all
/// tables is a tombstone.
///
/// Tables are visited oldest-generation-first so that a later (newer)
/// generation's record for a key always overwrites an earlier one — this
/// reproduces the engine's own newest-wins read-path semantics at the
/// compaction layer.
pub fn merge_live(tables: &[SSTable]) -> Result<BTreeMap<String, String>, SSTableError> {
    let mut ordered: Vec<&SSTable> = tables.iter().collect();
    ordered.sort_by_key(|t| t.generation());

    let mut resolved: BTreeMap<String, Option<String>> = BTreeMap::new();
    for table in ordered {
        for entry in table.iter_all()? {
            let (key, value) = entry?;
            resolved.insert(key, value);
        }
    }

    Ok(resolved
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect())
}
