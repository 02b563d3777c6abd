//! Opening an existing SSTable and performing point lookups / full scans.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::format::{generation_from_filename, index_file_name, DataRecord};
use crate::{SSTable, SSTableError};

impl SSTable {
    /// The generation (creation timestamp in milliseconds) this table was
    /// written with. Higher generations are newer and shadow lower ones.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` if this table is the product of compaction.
    #[must_use]
    pub fn is_compacted(&self) -> bool {
        self.compacted
    }

    /// The data file's path.
    #[must_use]
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// The sparse index's path.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        let name = self
            .data_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        self.data_path.with_file_name(index_file_name(name))
    }

    /// Opens an already-written SSTable by reading its index file; the data
    /// file is only opened later, on demand, for lookups and scans.
    pub fn open(data_path: &Path) -> Result<SSTable, SSTableError> {
        let name = data_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SSTableError::InvalidFileName(data_path.to_path_buf()))?;
        let generation = generation_from_filename(name)
            .ok_or_else(|| SSTableError::InvalidFileName(data_path.to_path_buf()))?;
        let compacted = name.contains("_compacted");

        let index_path = data_path.with_file_name(index_file_name(name));
        let index_file = File::open(&index_path)?;
        let index: BTreeMap<String, u64> = serde_json::from_reader(BufReader::new(index_file))?;

        Ok(SSTable {
            generation,
            data_path: data_path.to_path_buf(),
            compacted,
            index,
        })
    }

    /// Point lookup. Returns the outer `None` if the key is absent from this
    /// table; `Some(None)` if the key is present as a tombstone; `Some(Some(v))`
    /// for a live value.
    ///
    /// Uses the sparse index to find the largest sampled key `<=` the target
    /// and seeks there before scanning forward. When no sampled key is `<=`
    /// the target (the target sorts before everything indexed, or the index
    /// is empty), the scan starts at offset 0 rather than reporting "not
    /// found" without looking.
    pub fn get(&self, key: &str) -> Result<Option<Option<String>>, SSTableError> {
        let start_offset = self
            .index
            .range(..=key.to_string())
            .next_back()
            .map(|(_, offset)| *offset)
            .unwrap_or(0);

        let mut file = File::open(&self.data_path)?;
        file.seek(SeekFrom::Start(start_offset))?;
        let reader = BufReader::new(file);

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: DataRecord = serde_json::from_str(&line)
                .map_err(|_| SSTableError::Corrupt(self.data_path.clone()))?;
            match record.key.as_str().cmp(key) {
                std::cmp::Ordering::Equal => return Ok(Some(record.value)),
                std::cmp::Ordering::Greater => return Ok(None),
                std::cmp::Ordering::Less => continue,
            }
        }
        Ok(None)
    }

    /// Iterates every record in the data file, in ascending key order,
    /// tombstones included. Used by compaction to merge across tables.
    pub fn iter_all(&self) -> Result<impl Iterator<Item = Result<(String, Option<String>), SSTableError>>, SSTableError> {
        let file = File::open(&self.data_path)?;
        let path = self.data_path.clone();
        Ok(BufReader::new(file).lines().filter_map(move |line| {
            let line = match line {
                Ok(l) => l,
                Err(e) => return Some(Err(SSTableError::Io(e))),
            };
            if line.trim().is_empty() {
                return None;
            }
            match serde_json::from_str::<DataRecord>(&line) {
                Ok(rec) => Some(Ok((rec.key, rec.value))),
                Err(_) => Some(Err(SSTableError::Corrupt(path.clone()))),
            }
        }))
    }
}
