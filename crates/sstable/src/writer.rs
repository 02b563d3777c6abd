//! Writing a sorted run of records out as a new immutable SSTable.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use crate::format::{data_file_name, index_file_name, DataRecord};
use crate::{SSTable, SSTableError};

impl SSTable {
    /// Writes `records` (must already be sorted by ascending key) to a new
    /// SSTable data file in `dir`, named from `generation`.
    ///
    /// Every `index_sample`-th record gets an entry in the sparse index
    /// (`index_sample == 1` indexes every key; `0` is normalized to `1`).
    /// Both files are flushed and `sync_all`-ed before this returns — the
    /// data file first, then the index — so the caller never observes an
    /// SSTable whose data is not yet durable.
    pub fn write<I>(
        dir: &Path,
        generation: u64,
        records: I,
        index_sample: usize,
        compacted: bool,
    ) -> Result<SSTable, SSTableError>
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        let stride = index_sample.max(1);
        let data_name = data_file_name(generation, compacted);
        let data_path = dir.join(&data_name);
        let index_path = dir.join(index_file_name(&data_name));

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&data_path)?;
        let mut writer = BufWriter::new(file);

        let mut index = BTreeMap::new();
        let mut count: usize = 0;
        for (key, value) in records {
            let offset = writer.stream_position()?;
            if count % stride == 0 {
                index.insert(key.clone(), offset);
            }
            let line = serde_json::to_string(&DataRecord { key, value })?;
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
            count += 1;
        }

        writer.flush()?;
        writer
            .into_inner()
            .map_err(std::io::IntoInnerError::into_error)?
            .sync_all()?;

        let index_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&index_path)?;
        let mut index_writer = BufWriter::new(index_file);
        serde_json::to_writer(&mut index_writer, &index)?;
        index_writer.flush()?;
        index_writer
            .into_inner()
            .map_err(std::io::IntoInnerError::into_error)?
            .sync_all()?;

        tracing::info!(
            generation,
            records = count,
            compacted,
            "sstable written"
        );

        Ok(SSTable {
            generation,
            data_path,
            compacted,
            index,
        })
    }

    /// Convenience entry point used by the engine's flush path: writes every
    /// `(key, value)` pair in the memtable's iteration order (already
    /// ascending) as a fresh, non-compacted SSTable.
    pub fn write_from_memtable(
        dir: &Path,
        generation: u64,
        mem: &memtable::Memtable,
        index_sample: usize,
    ) -> Result<SSTable, SSTableError> {
        let records: Vec<(String, Option<String>)> = mem
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self::write(dir, generation, records, index_sample, false)
    }

    pub(crate) fn data_path_for(dir: &Path, generation: u64, compacted: bool) -> PathBuf {
        dir.join(data_file_name(generation, compacted))
    }
}
