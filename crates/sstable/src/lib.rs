//! # SSTable — Sorted String Table
//!
//! Immutable, on-disk storage segments for the document store's LSM engine.
//! When the in-memory [`memtable::Memtable`] crosses its size threshold the
//! engine flushes it here as an SSTable: a plain JSON-lines data file plus a
//! sparse index mapping a sampled subset of keys to byte offsets. SSTables
//! are write-once, read-many — once created they are never modified, only
//! superseded by compaction.
//!
//! Two files per table: `sst_<ts>.jsonl` (data, one JSON object per line)
//! and `sst_<ts>.jsonl.idx` (a single JSON object, `key -> offset`). `<ts>`
//! is the creation time in milliseconds and doubles as the table's
//! generation — higher generations are newer and shadow lower ones on
//! conflicting keys.

mod format;
mod merge;
mod reader;
mod writer;

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

pub use merge::merge_live;
use thiserror::Error;

/// Errors raised by SSTable writes, opens, and scans.
#[derive(Debug, Error)]
pub enum SSTableError {
    /// Underlying filesystem failure.
    #[error("sstable io error: {0}")]
    Io(#[from] io::Error),
    /// Index or data-record JSON failed to parse (on write, this indicates a
    /// serialization bug; on read, disk corruption).
    #[error("sstable json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A data line could not be parsed as a record. Unlike a WAL replay,
    /// SSTables are written atomically in one pass and are never expected to
    /// contain a torn tail, so any malformed line here is corruption.
    #[error("corrupt sstable record in {0:?}")]
    Corrupt(PathBuf),
    /// The data file name did not match the `sst_<ts>[_compacted].jsonl`
    /// convention, so no generation could be recovered from it.
    #[error("invalid sstable file name: {0:?}")]
    InvalidFileName(PathBuf),
}

/// A handle to one immutable on-disk segment.
///
/// Holds the in-memory sparse index (loaded once, at write or open time);
/// the data file itself is opened fresh for every lookup or scan and closed
/// immediately after, per the engine's file-handle discipline.
#[derive(Debug, Clone)]
pub struct SSTable {
    generation: u64,
    data_path: PathBuf,
    compacted: bool,
    index: BTreeMap<String, u64>,
}
