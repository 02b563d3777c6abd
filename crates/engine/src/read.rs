//! Read path: point `get`.

use crate::{Engine, EngineError, GetResult};

impl Engine {
    /// Looks up `key`: the memtable first, then SSTables newest-to-oldest.
    ///
    /// A tombstone anywhere in the search order is returned as `Deleted` —
    /// it shadows any older value and must never be reported as
    /// `NotFound`. Only exhausting every SSTable without any hit at all
    /// (memtable included) yields `NotFound`.
    pub fn get(&self, key: &str) -> Result<GetResult, EngineError> {
        if let Some(value) = self.memtable.get(key) {
            return Ok(match value {
                Some(v) => GetResult::Value(v.clone()),
                None => GetResult::Deleted,
            });
        }

        for table in self.sstables.iter().rev() {
            if let Some(value) = table.get(key)? {
                return Ok(match value {
                    Some(v) => GetResult::Value(v),
                    None => GetResult::Deleted,
                });
            }
        }

        Ok(GetResult::NotFound)
    }
}
