//! Cold-start recovery: WAL replay and SSTable directory enumeration.

use std::path::PathBuf;

use config::Config;
use memtable::Memtable;
use sstable::SSTable;
use wal::Wal;

use crate::{Engine, EngineError};

const WAL_FILE_NAME: &str = "wal.log";

pub(crate) fn open(dir: PathBuf, config: Config) -> Result<Engine, EngineError> {
    let wal_path = dir.join(WAL_FILE_NAME);
    let mut wal = Wal::open(&wal_path, config.wal_sync)?;
    let replayed = wal.replay()?;
    let memtable = Memtable::from_replayed(replayed);

    let sstables = discover_sstables(&dir)?;
    let last_generation = sstables.iter().map(SSTable::generation).max().unwrap_or(0);

    tracing::info!(
        replayed_records = memtable.len(),
        sstables = sstables.len(),
        dir = %dir.display(),
        "engine opened"
    );

    Ok(Engine {
        dir,
        wal,
        memtable,
        sstables,
        config,
        last_generation,
    })
}

/// Scans `dir` for `sst_*.jsonl` data files, opens each, and returns them
/// sorted oldest-generation-first.
///
/// Handles the post-crash-compaction ambiguity described in the compaction
/// module: a compacted table is discarded only when a non-compacted table
/// with a *lower* generation is also present, since that is exactly the
/// signature of a crash between the compacted file becoming durable and its
/// pre-compaction originals being deleted. A non-compacted table with a
/// higher generation than a given compacted one is an unrelated, later
/// flush and is kept alongside it.
fn discover_sstables(dir: &std::path::Path) -> Result<Vec<SSTable>, EngineError> {
    let mut data_files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("sst_") && n.ends_with(".jsonl"))
                .unwrap_or(false)
        })
        .collect();

    let mut tables: Vec<SSTable> = Vec::new();
    for path in data_files.drain(..) {
        tables.push(SSTable::open(&path)?);
    }
    tables.sort_by_key(|t| t.generation());

    // `Engine::next_generation` always mints a generation strictly greater
    // than every generation already handed out, so a compacted table's
    // generation is always greater than every one of the original inputs it
    // was built from. A crash between writing the compacted file and
    // deleting its originals therefore leaves those originals on disk with
    // generations *below* the orphaned compacted table's own — that's the
    // only case recovery should discard a compacted table for. A
    // non-compacted table with a *higher* generation than a compacted one
    // is simply a later, independent flush and must not cause the
    // compacted table (and everything only it holds) to be dropped.
    let noncompacted_generations: Vec<u64> = tables
        .iter()
        .filter(|t| !t.is_compacted())
        .map(SSTable::generation)
        .collect();
    tables.retain(|t| {
        if !t.is_compacted() {
            return true;
        }
        let orphaned = noncompacted_generations
            .iter()
            .any(|&g| g < t.generation());
        if orphaned {
            tracing::warn!(
                generation = t.generation(),
                "discarding orphaned compaction artifact found alongside its pre-compaction originals"
            );
        }
        !orphaned
    });

    Ok(tables)
}
