//! # Engine — the LSM storage engine
//!
//! Coordinates the [`wal`] write-ahead log, the in-memory [`memtable`], and
//! the ordered list of on-disk [`sstable::SSTable`]s into the document
//! store's single storage stack. This is the crate the document layer
//! embeds; it knows nothing about collections, documents, or schemas — only
//! string-shaped keys and optional string values.
//!
//! ## Architecture
//!
//! ```text
//! put/del
//!   |
//!   v
//! WAL append (durable)  ──►  Memtable update
//!                                 |
//!                                 | size >= threshold?
//!                                 v
//!                             flush() ──► new SSTable, WAL rotated, memtable cleared
//!
//! get
//!   |
//!   v
//! Memtable  ──► (miss) ──►  SSTables, newest generation first
//! ```
//!
//! ## Module responsibilities
//!
//! | Module         | Purpose                                            |
//! |----------------|-----------------------------------------------------|
//! | `lib.rs`       | `Engine` struct, `open`, accessors                  |
//! | `recovery`     | WAL replay + SSTable directory enumeration on open  |
//! | `write`        | `put`, `delete`, the internal `flush`               |
//! | `read`         | `get`                                               |
//! | `compaction`   | `compact`: newest-wins merge, tombstone drop        |
//!
//! ## Crash safety
//!
//! Every write is appended to the WAL before the memtable is touched. A
//! flush writes the new SSTable durably before the WAL is rotated. A
//! compaction writes the merged SSTable durably before the old SSTable files
//! are deleted.

mod compaction;
mod read;
mod recovery;
mod write;

use std::io;
use std::path::PathBuf;

use config::Config;
use memtable::Memtable;
use sstable::SSTable;
use thiserror::Error;
use wal::{Wal, WalError};

/// Errors raised by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Underlying filesystem failure during WAL append, SSTable write, or
    /// compaction. Considered unrecoverable for the operation in progress
    /// and likely for the engine as a whole.
    #[error("storage error: {0}")]
    Storage(#[from] io::Error),
    /// The write-ahead log failed to open, append, or rotate.
    #[error("wal error: {0}")]
    Wal(#[from] WalError),
    /// An SSTable failed to write, open, or scan.
    #[error("sstable error: {0}")]
    SSTable(#[from] sstable::SSTableError),
}

/// The outcome of a point [`Engine::get`].
///
/// Replaces an ambiguous "tombstone vs not found" branch with an explicit,
/// exhaustively-matched three-way result: a tombstone anywhere in the search
/// order is `Deleted`, never confused with `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetResult {
    /// The key holds a live value.
    Value(String),
    /// The key was written, then deleted; no SSTable or memtable entry older
    /// than the tombstone is visible.
    Deleted,
    /// No memtable entry and no SSTable contains this key at all.
    NotFound,
}

impl GetResult {
    /// Converts to `Option<String>`, treating `Deleted` and `NotFound`
    /// identically as "no value" — convenient for callers that only care
    /// about presence, not why a key is absent.
    #[must_use]
    pub fn into_option(self) -> Option<String> {
        match self {
            GetResult::Value(v) => Some(v),
            GetResult::Deleted | GetResult::NotFound => None,
        }
    }
}

/// Coordinates the WAL, memtable, and SSTable list for one data directory.
///
/// Not `Sync`: every public method takes `&mut self` or otherwise assumes a
/// single scheduling context at a time, per the engine's single-threaded
/// cooperative concurrency model. A caller embedding this in a
/// multi-threaded host should wrap it in a `Mutex`.
pub struct Engine {
    dir: PathBuf,
    wal: Wal,
    memtable: Memtable,
    sstables: Vec<SSTable>,
    config: Config,
    /// Highest generation handed out so far (by flush or compaction), used
    /// to guarantee strictly increasing generations even when two flushes
    /// land within the same millisecond.
    last_generation: u64,
}

impl Engine {
    /// Opens (or creates) the engine's data directory, replays the WAL into
    /// a fresh memtable, and enumerates existing SSTables in generation
    /// order (oldest first).
    pub fn open(dir: impl Into<PathBuf>, config: Config) -> Result<Self, EngineError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        recovery::open(dir, config)
    }

    /// Read-only access to the memtable, for the collection scan path.
    #[must_use]
    pub fn memtable(&self) -> &Memtable {
        &self.memtable
    }

    /// Read-only access to the SSTable list, oldest first, for the
    /// collection scan path.
    #[must_use]
    pub fn sstables(&self) -> &[SSTable] {
        &self.sstables
    }

    /// The data directory this engine is rooted at.
    #[must_use]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Flushes any remaining memtable contents, then closes the WAL.
    pub fn close(mut self) -> Result<(), EngineError> {
        self.flush()?;
        self.wal.close()?;
        Ok(())
    }

    /// Mints a generation strictly greater than every generation handed out
    /// so far, falling back to `last_generation + 1` when the wall clock
    /// hasn't advanced since the previous flush or compaction.
    pub(crate) fn next_generation(&mut self) -> u64 {
        let candidate = write::now_millis().max(self.last_generation + 1);
        self.last_generation = candidate;
        candidate
    }
}
