//! # Memtable
//!
//! The in-memory, sorted write buffer sitting in front of the on-disk
//! SSTable list. Every `put`/`del` the engine accepts lands here first
//! (after the WAL append) and stays here until a flush promotes it to an
//! SSTable.
//!
//! A memtable entry is `key -> Option<String>`: `Some(value)` is a live
//! write, `None` is a tombstone. Both are authoritative for the key they
//! occupy — a tombstoned key must not be confused with a key that was
//! never written.
//!
//! ## Example
//!
//! ```rust
//! use memtable::Memtable;
//!
//! let mut m = Memtable::new();
//! m.put("hello".to_string(), "world".to_string());
//! assert_eq!(m.get("hello"), Some(&Some("world".to_string())));
//!
//! m.delete("hello".to_string());
//! assert_eq!(m.get("hello"), Some(&None));
//! assert_eq!(m.get("missing"), None);
//! ```

use std::collections::BTreeMap;

/// A sorted, in-memory mapping from key to optional value.
///
/// Backed by a `BTreeMap` so iteration is always in ascending key order,
/// which is exactly the order an SSTable flush needs its records in.
#[derive(Debug, Default, Clone)]
pub struct Memtable {
    map: BTreeMap<String, Option<String>>,
}

impl Memtable {
    /// Creates a new, empty memtable.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Rebuilds a memtable from a WAL replay result (`key -> Some(value)` for
    /// a live write, `key -> None` for a tombstone).
    #[must_use]
    pub fn from_replayed(entries: BTreeMap<String, Option<String>>) -> Self {
        Self { map: entries }
    }

    /// Records a live write for `key`, replacing whatever was there before.
    pub fn put(&mut self, key: String, value: String) {
        self.map.insert(key, Some(value));
    }

    /// Records a tombstone for `key`. Tombstones are kept, not removed,
    /// since they must shadow older values in SSTables until compaction.
    pub fn delete(&mut self, key: String) {
        self.map.insert(key, None);
    }

    /// Looks up `key`.
    ///
    /// Returns `None` if the key has never been written to this memtable,
    /// `Some(&Some(v))` for a live value, `Some(&None)` for a tombstone.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Option<String>> {
        self.map.get(key)
    }

    /// Iterates entries in ascending key order, tombstones included.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<String>)> {
        self.map.iter()
    }

    /// Iterates entries whose key starts with `prefix`, ascending, tombstones
    /// included. Used by the collection scan path to stay within one
    /// collection's key namespace without touching unrelated keys.
    pub fn iter_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a Option<String>)> {
        self.map
            .range(prefix.to_string()..)
            .take_while(move |(k, _)| k.starts_with(prefix))
    }

    /// Number of entries held (live values and tombstones alike).
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// `true` if the memtable holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drains all entries, resetting the memtable to empty. Used after a
    /// successful flush.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
