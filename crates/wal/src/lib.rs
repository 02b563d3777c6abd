//! # WAL — Write-Ahead Log
//!
//! Provides crash-safe durability for the document store's storage engine.
//!
//! Every mutation (`put` or `del`) is serialized into a self-delimited JSON
//! text record and appended to the WAL **before** the corresponding
//! in-memory update. On restart the WAL is replayed to reconstruct the
//! memtable, guaranteeing that no acknowledged write is lost.
//!
//! ## Record format
//!
//! One JSON object per line:
//!
//! ```text
//! {"op": "put", "key": "users:1", "value": "{\"name\":\"Bob\"}"}
//! {"op": "del", "key": "users:1"}
//! ```
//!
//! A `del` record carries no `value` field (equivalently, `value: null`).
//!
//! ## Example
//!
//! ```rust,no_run
//! use wal::Wal;
//!
//! let mut log = Wal::open("wal.log", true).unwrap();
//! log.append_put("hello", "world").unwrap();
//! let memtable = log.replay().unwrap();
//! assert_eq!(memtable.get("hello"), Some(&Some("world".to_string())));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

/// Errors that can occur during WAL operations.
#[derive(Debug, Error)]
pub enum WalError {
    /// An underlying I/O error (open, append, or rename failure).
    #[error("wal io error: {0}")]
    Io(#[from] io::Error),
}

/// One line of the on-disk WAL format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct WalLine {
    op: WalOp,
    key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WalOp {
    Put,
    Del,
}

/// The reconstructed memtable state produced by [`Wal::replay`].
///
/// `key -> Some(value)` is a live write; `key -> None` is a tombstone.
pub type ReplayedMemtable = BTreeMap<String, Option<String>>;

/// Append-only, fsync-backed write-ahead log.
///
/// Holds one open file handle for the lifetime of the WAL, except briefly
/// during [`reset`](Wal::reset) while the old handle is closed and the new
/// one has not yet been opened.
pub struct Wal {
    path: PathBuf,
    file: File,
    sync: bool,
}

impl Wal {
    /// Opens (or creates) a WAL file in read/append mode.
    ///
    /// # Arguments
    ///
    /// * `path` — file system path for the WAL (created if missing).
    /// * `sync` — if `true`, every [`append_put`](Wal::append_put) /
    ///   [`append_del`](Wal::append_del) call is followed by `fsync`.
    pub fn open<P: AsRef<Path>>(path: P, sync: bool) -> Result<Self, WalError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(&path)?;
        Ok(Self { path, file, sync })
    }

    /// Appends a `put` record for `key`/`value`, durable before returning.
    pub fn append_put(&mut self, key: &str, value: &str) -> Result<(), WalError> {
        self.append(&WalLine {
            op: WalOp::Put,
            key: key.to_string(),
            value: Some(value.to_string()),
        })
    }

    /// Appends a `del` (tombstone) record for `key`, durable before returning.
    pub fn append_del(&mut self, key: &str) -> Result<(), WalError> {
        self.append(&WalLine {
            op: WalOp::Del,
            key: key.to_string(),
            value: None,
        })
    }

    fn append(&mut self, line: &WalLine) -> Result<(), WalError> {
        let mut encoded = serde_json::to_string(line).expect("WalLine always serializes");
        encoded.push('\n');
        self.file.write_all(encoded.as_bytes())?;
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }

    /// Replays the log from the beginning, folding it into a memtable-shaped
    /// map: a `put` sets `key -> Some(value)`, a `del` sets `key -> None`.
    ///
    /// Stops at the first line that fails to parse as a [`WalLine`] and
    /// treats everything read so far as committed (tail-torn-write
    /// tolerance) — this is not an error, since a crash mid-append is an
    /// expected failure mode, not corruption.
    pub fn replay(&mut self) -> Result<ReplayedMemtable, WalError> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut mem = ReplayedMemtable::new();
        let reader = BufReader::new(&self.file);

        for line in reader.lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => break,
            };
            if line.trim().is_empty() {
                continue;
            }
            let parsed: WalLine = match serde_json::from_str(&line) {
                Ok(l) => l,
                Err(_) => {
                    tracing::warn!("wal replay stopped at unparseable trailing line");
                    break;
                }
            };
            match parsed.op {
                WalOp::Put => {
                    mem.insert(parsed.key, parsed.value);
                }
                WalOp::Del => {
                    mem.insert(parsed.key, None);
                }
            }
        }

        self.file.seek(SeekFrom::End(0))?;
        tracing::info!(records = mem.len(), "wal replay complete");
        Ok(mem)
    }

    /// Atomically retires the current log file (renamed to
    /// `<path>.<millis-since-epoch>`) and opens a fresh, empty log in its
    /// place.
    ///
    /// Called by the engine during flush, strictly after the corresponding
    /// SSTable has been durably written — a crash before that point must
    /// still find the pre-flush WAL intact.
    pub fn reset(&mut self) -> Result<(), WalError> {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before epoch")
            .as_millis();
        let archived = archived_path(&self.path, ts);

        fs::rename(&self.path, &archived)?;

        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(&self.path)?;
        tracing::info!(archived = %archived.display(), "wal rotated");
        Ok(())
    }

    /// Flushes and closes the underlying file handle.
    pub fn close(mut self) -> Result<(), WalError> {
        self.file.flush()?;
        Ok(())
    }
}

fn archived_path(path: &Path, ts: u128) -> PathBuf {
    let mut name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("wal.log")
        .to_string();
    name.push_str(&format!(".{ts}"));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests;
