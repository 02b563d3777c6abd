//! # CLI — an interactive shell over the storage engine
//!
//! A REPL that drives [`engine::Engine`] directly (the raw WAL/memtable/
//! SSTable stack, not the document/collection/schema layer above it). Reads
//! commands from stdin, executes them, prints results to stdout. Works both
//! interactively and piped (`cargo run -p cli < commands.txt`).
//!
//! ## Commands
//!
//! ```text
//! SET key value      Insert or update a key
//! GET key            Look up a key (prints value or "(nil)")
//! DEL key            Delete a key (writes a tombstone)
//! SCAN [start] [end] Range scan; start inclusive, end exclusive
//! FLUSH              Force a memtable flush to a new SSTable
//! COMPACT            Merge every SSTable into one, dropping tombstones
//! STATS              Print memtable/SSTable counts
//! EXIT / QUIT        Flush, close, and exit
//! ```
//!
//! ## Configuration
//!
//! ```text
//! RIPTIDE_DATA_DIR       data directory              (default: "riptide_data")
//! RIPTIDE_MEMTABLE_LIMIT records before auto-flush    (default: 2000)
//! RIPTIDE_INDEX_SAMPLE   SSTable sparse-index stride  (default: 16)
//! RIPTIDE_WAL_SYNC       fsync every WAL append       (default: "true")
//! ```

mod scan;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use config::Config;
use engine::{Engine, GetResult};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn main() -> Result<()> {
    let data_dir = env_or("RIPTIDE_DATA_DIR", "riptide_data");
    let memtable_limit: usize = env_or("RIPTIDE_MEMTABLE_LIMIT", "2000").parse().unwrap_or(2000);
    let index_sample: usize = env_or("RIPTIDE_INDEX_SAMPLE", "16").parse().unwrap_or(16);
    let wal_sync: bool = env_or("RIPTIDE_WAL_SYNC", "true").parse().unwrap_or(true);

    let config = Config {
        memtable_limit,
        index_sample,
        wal_sync,
    };
    let mut engine = Engine::open(&data_dir, config)?;

    println!(
        "RiptideKV started (dir={data_dir}, memtable_limit={memtable_limit}, index_sample={index_sample}, wal_sync={wal_sync})"
    );
    println!("Commands: SET key value | GET key | DEL key | SCAN [start] [end]");
    println!("          FLUSH | COMPACT | STATS | EXIT");
    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        match parts.next().map(str::to_uppercase).as_deref() {
            Some("SET") => match parts.next() {
                Some(key) => {
                    let value: String = parts.collect::<Vec<&str>>().join(" ");
                    if value.is_empty() {
                        println!("ERR usage: SET key value");
                    } else {
                        match engine.put(key, &value) {
                            Ok(()) => println!("OK"),
                            Err(e) => println!("ERR set failed: {e}"),
                        }
                    }
                }
                None => println!("ERR usage: SET key value"),
            },
            Some("GET") => match parts.next() {
                Some(key) => match engine.get(key) {
                    Ok(GetResult::Value(v)) => println!("{v}"),
                    Ok(GetResult::Deleted | GetResult::NotFound) => println!("(nil)"),
                    Err(e) => println!("ERR get failed: {e}"),
                },
                None => println!("ERR usage: GET key"),
            },
            Some("DEL") => match parts.next() {
                Some(key) => match engine.delete(key) {
                    Ok(()) => println!("OK"),
                    Err(e) => println!("ERR del failed: {e}"),
                },
                None => println!("ERR usage: DEL key"),
            },
            Some("SCAN") => {
                let start = parts.next().unwrap_or("");
                let end = parts.next().unwrap_or("");
                match scan::range(&engine, start, end) {
                    Ok(results) => {
                        if results.is_empty() {
                            println!("(empty)");
                        } else {
                            for (k, v) in &results {
                                println!("{k} -> {v}");
                            }
                            println!("({} entries)", results.len());
                        }
                    }
                    Err(e) => println!("ERR scan failed: {e}"),
                }
            }
            Some("FLUSH") => match engine.flush() {
                Ok(()) => println!("OK (sstables={})", engine.sstables().len()),
                Err(e) => println!("ERR flush failed: {e}"),
            },
            Some("COMPACT") => match engine.compact() {
                Ok(()) => println!("OK (sstables={})", engine.sstables().len()),
                Err(e) => println!("ERR compact failed: {e}"),
            },
            Some("STATS") => {
                println!(
                    "memtable={} sstables={} dir={}",
                    engine.memtable().len(),
                    engine.sstables().len(),
                    engine.dir().display()
                );
            }
            Some("EXIT" | "QUIT") => {
                println!("bye");
                break;
            }
            Some(other) => println!("unknown command: {other}"),
            None => {}
        }

        print!("> ");
        io::stdout().flush().ok();
    }

    engine.close()?;
    Ok(())
}
