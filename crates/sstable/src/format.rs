//! On-disk record shape shared by the data file and its sparse index.
//!
//! One JSON object per line in the data file:
//!
//! ```text
//! {"key": "users:1", "value": "{\"name\":\"Bob\"}"}
//! {"key": "users:2"}
//! ```
//!
//! A tombstoned key carries no `value` field (equivalently, `value: null`).
//! The index file is a single JSON object mapping a sampled subset of keys to
//! their byte offset in the data file.

use serde::{Deserialize, Serialize};

/// One line of an SSTable data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct DataRecord {
    pub(crate) key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) value: Option<String>,
}

/// Parses the generation (creation timestamp in milliseconds) out of an
/// SSTable data file name: `sst_<ts>.jsonl` or `sst_<ts>_compacted.jsonl`.
pub(crate) fn generation_from_filename(name: &str) -> Option<u64> {
    let stem = name.strip_prefix("sst_")?;
    let stem = stem.strip_suffix(".jsonl")?;
    let stem = stem.strip_suffix("_compacted").unwrap_or(stem);
    stem.parse().ok()
}

/// Builds the data file name for a generation, optionally marking it as the
/// product of compaction.
pub(crate) fn data_file_name(generation: u64, compacted: bool) -> String {
    if compacted {
        format!("sst_{generation}_compacted.jsonl")
    } else {
        format!("sst_{generation}.jsonl")
    }
}

/// Builds the sparse-index file name for a data file name.
pub(crate) fn index_file_name(data_file_name: &str) -> String {
    format!("{data_file_name}.idx")
}
