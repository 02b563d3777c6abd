use super::*;
use std::fs;
use std::io::Write as _;
use tempfile::tempdir;

fn open(path: &std::path::Path, sync: bool) -> Wal {
    Wal::open(path, sync).unwrap()
}

// -------------------- Basic write & replay --------------------

#[test]
fn write_and_replay_put_and_del() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    let mut w = open(&path, true);
    w.append_put("k", "v1").unwrap();
    w.append_put("k2", "v2").unwrap();
    w.append_del("k").unwrap();

    let mem = w.replay().unwrap();
    assert_eq!(mem.get("k"), Some(&None));
    assert_eq!(mem.get("k2"), Some(&Some("v2".to_string())));
    assert_eq!(mem.len(), 2);
}

#[test]
fn single_put_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    let mut w = open(&path, true);
    w.append_put("hello", "world").unwrap();

    let mem = w.replay().unwrap();
    assert_eq!(mem.get("hello"), Some(&Some("world".to_string())));
    assert_eq!(mem.len(), 1);
}

#[test]
fn single_del_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    let mut w = open(&path, true);
    w.append_del("gone").unwrap();

    let mem = w.replay().unwrap();
    assert_eq!(mem.get("gone"), Some(&None));
    assert_eq!(mem.len(), 1);
}

#[test]
fn last_write_wins_on_replay() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    let mut w = open(&path, true);
    w.append_put("k", "v1").unwrap();
    w.append_put("k", "v2").unwrap();
    w.append_del("k").unwrap();
    w.append_put("k", "v3").unwrap();

    let mem = w.replay().unwrap();
    assert_eq!(mem.get("k"), Some(&Some("v3".to_string())));
    assert_eq!(mem.len(), 1);
}

#[test]
fn empty_key_and_value() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    let mut w = open(&path, true);
    w.append_put("", "").unwrap();

    let mem = w.replay().unwrap();
    assert_eq!(mem.get(""), Some(&Some(String::new())));
}

// -------------------- Empty / fresh WAL --------------------

#[test]
fn replay_fresh_file_is_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    let mut w = open(&path, true);
    let mem = w.replay().unwrap();
    assert!(mem.is_empty());
}

#[test]
fn open_creates_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("new_wal.log");
    assert!(!path.exists());

    let _w = open(&path, true);
    assert!(path.exists());
}

// -------------------- Torn-tail tolerance --------------------

#[test]
fn replay_tolerates_torn_trailing_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    {
        let mut w = open(&path, true);
        w.append_put("k1", "v1").unwrap();
        w.append_put("k2", "v2").unwrap();
    }

    // Simulate a crash mid-append: a truncated, unparseable trailing line.
    let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(b"{\"op\":\"put\",\"key\":\"k3\",\"valu").unwrap();

    let mut w = open(&path, true);
    let mem = w.replay().unwrap();
    assert_eq!(mem.len(), 2);
    assert_eq!(mem.get("k1"), Some(&Some("v1".to_string())));
    assert_eq!(mem.get("k2"), Some(&Some("v2".to_string())));
    assert!(mem.get("k3").is_none());
}

#[test]
fn replay_ignores_blank_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    {
        let mut w = open(&path, true);
        w.append_put("k1", "v1").unwrap();
    }
    let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(b"\n\n").unwrap();

    let mut w = open(&path, true);
    let mem = w.replay().unwrap();
    assert_eq!(mem.len(), 1);
}

// -------------------- Append-after-reopen / unsynced --------------------

#[test]
fn append_to_existing_wal_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    {
        let mut w = open(&path, true);
        w.append_put("a", "1").unwrap();
    }
    {
        let mut w = open(&path, true);
        w.append_put("b", "2").unwrap();
    }

    let mut w = open(&path, true);
    let mem = w.replay().unwrap();
    assert_eq!(mem.len(), 2);
    assert_eq!(mem.get("a"), Some(&Some("1".to_string())));
    assert_eq!(mem.get("b"), Some(&Some("2".to_string())));
}

#[test]
fn unsynced_writes_are_still_readable_without_explicit_sync() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    let mut w = open(&path, false);
    w.append_put("k", "v").unwrap();
    let mem = w.replay().unwrap();
    assert_eq!(mem.get("k"), Some(&Some("v".to_string())));
}

// -------------------- reset / close --------------------

#[test]
fn reset_archives_old_file_and_starts_fresh() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    let mut w = open(&path, true);
    w.append_put("k", "v").unwrap();
    w.reset().unwrap();

    let mem = w.replay().unwrap();
    assert!(mem.is_empty(), "fresh log after reset should replay empty");

    let archived = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .any(|e| e.file_name().to_string_lossy().starts_with("wal.log."));
    assert!(archived, "expected an archived copy of the pre-reset wal");
}

#[test]
fn writes_after_reset_do_not_resurrect_archived_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    let mut w = open(&path, true);
    w.append_put("old", "v").unwrap();
    w.reset().unwrap();
    w.append_put("new", "v2").unwrap();

    let mem = w.replay().unwrap();
    assert_eq!(mem.len(), 1);
    assert_eq!(mem.get("new"), Some(&Some("v2".to_string())));
    assert!(mem.get("old").is_none());
}

#[test]
fn close_does_not_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    let mut w = open(&path, true);
    w.append_put("k", "v").unwrap();
    w.close().unwrap();
}

// -------------------- Stress --------------------

#[test]
fn many_records_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    let n = 5_000usize;
    let mut w = open(&path, false);
    for i in 0..n {
        w.append_put(&format!("key{i}"), &format!("val{i}")).unwrap();
    }

    let mem = w.replay().unwrap();
    assert_eq!(mem.len(), n);
    for i in 0..n {
        assert_eq!(mem.get(&format!("key{i}")), Some(&Some(format!("val{i}"))));
    }
}

#[test]
fn interleaved_puts_and_dels() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    let mut w = open(&path, false);
    for i in 0u64..999 {
        let key = format!("k{i}");
        if i % 3 == 0 {
            w.append_del(&key).unwrap();
        } else {
            w.append_put(&key, "v").unwrap();
        }
    }

    let mem = w.replay().unwrap();
    assert_eq!(mem.len(), 999);

    let del_count = mem.values().filter(|v| v.is_none()).count();
    let put_count = mem.len() - del_count;
    assert_eq!(del_count, 333);
    assert_eq!(put_count, 666);
}
