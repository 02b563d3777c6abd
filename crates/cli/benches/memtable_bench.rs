use criterion::{criterion_group, criterion_main, Criterion};
use memtable::Memtable;

const N_KEYS: usize = 50_000;

fn memtable_put_benchmark(c: &mut Criterion) {
    c.bench_function("memtable_put_50k_distinct_keys", |b| {
        b.iter(|| {
            let mut mem = Memtable::new();
            for i in 0..N_KEYS {
                mem.put(format!("key{i}"), "x".repeat(100));
            }
            mem
        });
    });
}

fn memtable_get_hit_benchmark(c: &mut Criterion) {
    let mut mem = Memtable::new();
    for i in 0..N_KEYS {
        mem.put(format!("key{i}"), "x".repeat(100));
    }

    c.bench_function("memtable_get_hit_50k", |b| {
        b.iter(|| {
            for i in 0..N_KEYS {
                let v = mem.get(&format!("key{i}"));
                assert!(v.is_some());
            }
        });
    });
}

fn memtable_iter_prefix_benchmark(c: &mut Criterion) {
    let mut mem = Memtable::new();
    for collection in ["users", "files"] {
        for i in 0..N_KEYS / 2 {
            mem.put(format!("{collection}:{i}"), "x".repeat(50));
        }
    }

    c.bench_function("memtable_iter_prefix_half", |b| {
        b.iter(|| {
            let count = mem.iter_prefix("users:").count();
            assert_eq!(count, N_KEYS / 2);
        });
    });
}

criterion_group!(
    benches,
    memtable_put_benchmark,
    memtable_get_hit_benchmark,
    memtable_iter_prefix_benchmark
);
criterion_main!(benches);
