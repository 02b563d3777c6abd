//! Write path: `put`, `delete`, and the internal `flush`.

use std::time::{SystemTime, UNIX_EPOCH};

use sstable::SSTable;

use crate::{Engine, EngineError};

impl Engine {
    /// Appends to the WAL, then applies the mutation to the memtable. If the
    /// memtable's record count reaches the configured threshold afterward,
    /// triggers exactly one flush.
    pub fn put(&mut self, key: &str, value: &str) -> Result<(), EngineError> {
        self.wal.append_put(key, value)?;
        self.memtable.put(key.to_string(), value.to_string());
        tracing::debug!(key, "put");
        self.maybe_flush()
    }

    /// Appends a tombstone to the WAL, then records it in the memtable.
    pub fn delete(&mut self, key: &str) -> Result<(), EngineError> {
        self.wal.append_del(key)?;
        self.memtable.delete(key.to_string());
        tracing::debug!(key, "delete");
        self.maybe_flush()
    }

    fn maybe_flush(&mut self) -> Result<(), EngineError> {
        if self.memtable.len() >= self.config.memtable_limit {
            self.flush()?;
        }
        Ok(())
    }

    /// Writes the memtable to a new SSTable, rotates the WAL, and clears the
    /// memtable. A no-op when the memtable is empty.
    ///
    /// Ordering is load-bearing: the SSTable must be durable on disk before
    /// the WAL is retired, otherwise a crash between the two steps would
    /// lose the memtable's contents entirely.
    pub fn flush(&mut self) -> Result<(), EngineError> {
        if self.memtable.is_empty() {
            return Ok(());
        }

        let generation = self.next_generation();
        let table = SSTable::write_from_memtable(
            &self.dir,
            generation,
            &self.memtable,
            self.config.index_sample(),
        )?;
        let record_count = self.memtable.len();

        self.sstables.push(table);
        self.wal.reset()?;
        self.memtable.clear();

        tracing::info!(generation, records = record_count, "memtable flushed");
        Ok(())
    }
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_millis() as u64
}
