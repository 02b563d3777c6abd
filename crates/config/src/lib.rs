//! # Config
//!
//! Typed configuration knobs shared by the storage stack: the memtable
//! flush threshold, the SSTable sparse-index sampling stride, and the WAL
//! fsync policy.
//!
//! This crate intentionally does not parse files or environment variables —
//! it is a plain value type that callers (the `document` crate, the demo
//! binary, tests) construct directly or via [`Config::default`].

/// Storage-engine configuration.
///
/// # Example
///
/// ```rust
/// use config::Config;
///
/// let cfg = Config::default();
/// assert_eq!(cfg.memtable_limit, 2000);
/// assert_eq!(cfg.index_sample, 16);
/// assert!(cfg.wal_sync);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of records the memtable may hold before a flush is triggered.
    pub memtable_limit: usize,
    /// Sparse-index sampling stride for SSTable writes: every `index_sample`-th
    /// record (by write order) gets an index entry. `0` is normalized to `1`
    /// (index every key) rather than causing a division by zero.
    pub index_sample: usize,
    /// If `true`, every WAL append is followed by an `fsync`. The spec defines
    /// no batched-write mode, so this is expected to stay `true` in production;
    /// tests may disable it to speed up large write loops.
    pub wal_sync: bool,
}

impl Config {
    /// Normalizes `index_sample`, clamping `0` up to `1`.
    #[must_use]
    pub fn index_sample(&self) -> usize {
        self.index_sample.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memtable_limit: 2000,
            index_sample: 16,
            wal_sync: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = Config::default();
        assert_eq!(cfg.memtable_limit, 2000);
        assert_eq!(cfg.index_sample, 16);
        assert!(cfg.wal_sync);
    }

    #[test]
    fn index_sample_normalizes_zero() {
        let cfg = Config {
            index_sample: 0,
            ..Config::default()
        };
        assert_eq!(cfg.index_sample(), 1);
    }
}
