//! The prefix-scoped, newest-wins scan underlying every `Collection` query.
//!
//! Reimplements the engine's own read-path shadowing at the iterator level,
//! independent of [`engine::Engine::get`]: the memtable is consulted first,
//! then each SSTable from newest to oldest, with identifiers already seen
//! (live or tombstoned) never revisited from an older table.

use std::collections::HashSet;

use engine::{Engine, EngineError};
use schema::Document;

use crate::error::CollectionError;

pub(crate) fn scan_docs(
    engine: &Engine,
    prefix: &str,
) -> Result<Vec<(String, Document)>, CollectionError> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for (key, value) in engine.memtable().iter_prefix(prefix) {
        let id = key[prefix.len()..].to_string();
        if seen.contains(&id) {
            continue;
        }
        seen.insert(id.clone());
        if let Some(raw) = value {
            out.push((id, decode(raw)?));
        }
    }

    for table in engine.sstables().iter().rev() {
        let records = table.iter_all().map_err(EngineError::from)?;
        for record in records {
            let (key, value) = record.map_err(EngineError::from)?;
            if !key.starts_with(prefix) {
                continue;
            }
            let id = key[prefix.len()..].to_string();
            if seen.contains(&id) {
                continue;
            }
            seen.insert(id.clone());
            if let Some(raw) = value {
                out.push((id, decode(&raw)?));
            }
        }
    }

    Ok(out)
}

fn decode(raw: &str) -> Result<Document, CollectionError> {
    serde_json::from_str(raw).map_err(CollectionError::from)
}
