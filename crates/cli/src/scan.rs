//! Range scan over the raw engine: memtable first, then each SSTable
//! newest-to-oldest, never revisiting a key already resolved by a newer
//! source.
//!
//! This is the same shadowing shape the `document` crate's collection scan
//! uses (memtable, then SSTables newest-first, "seen" set suppresses
//! shadowed keys and tombstones alike) with the collection key-prefix
//! dropped in favor of a `[start, end)` byte range, since the CLI talks to
//! the engine directly rather than through a named collection.

use std::collections::HashSet;

use anyhow::Result;
use engine::Engine;

/// All live `(key, value)` pairs with `start <= key < end`, in ascending key
/// order. An empty `start`/`end` bound is unbounded on that side.
pub fn range(engine: &Engine, start: &str, end: &str) -> Result<Vec<(String, String)>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for (key, value) in engine.memtable().iter() {
        if !in_range(key, start, end) || seen.contains(key) {
            continue;
        }
        seen.insert(key.clone());
        if let Some(v) = value {
            out.push((key.clone(), v.clone()));
        }
    }

    for table in engine.sstables().iter().rev() {
        for record in table.iter_all()? {
            let (key, value) = record?;
            if !in_range(&key, start, end) || seen.contains(&key) {
                continue;
            }
            seen.insert(key.clone());
            if let Some(v) = value {
                out.push((key, v));
            }
        }
    }

    out.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(out)
}

fn in_range(key: &str, start: &str, end: &str) -> bool {
    (start.is_empty() || key >= start) && (end.is_empty() || key < end)
}
